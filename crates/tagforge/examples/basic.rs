//! Example: Building, rendering and parsing a small page

use tagforge::{Markup, ParseOptions, tags};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("tagforge v{}", tagforge::VERSION);

    // Build a tree and render it
    let page = tags::div()
        .attr("cls", "hero")
        .child(tags::h1().child("tagforge"))
        .child(tags::p().child("Build trees, render markup, parse it back."));

    match page.to_markup() {
        Ok(markup) => println!("{markup}"),
        Err(e) => eprintln!("render failed: {e}"),
    }

    // Convert existing markup to a builder expression
    let expr = tagforge::markup_to_expr(
        "<ul><li>first</li><li>second</li></ul>",
        &ParseOptions::default(),
    );
    match expr {
        Ok(expr) => println!("{expr}"),
        Err(e) => eprintln!("conversion failed: {e}"),
    }
}
