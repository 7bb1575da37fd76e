//! Sharing one builder across threads with a thread-safe backend

use std::sync::Arc;

use rayon::prelude::*;

use markup_builder::backends::{Markup, MarkupBackend};
use markup_builder::builder::{Content, TreeBuilder};
use markup_builder::content;
use markup_builder::util::testing::init_test_setup;

#[test]
fn given_shared_markup_builder_when_building_in_parallel_then_results_match_sequential() {
    // Arrange
    init_test_setup();
    let builder = TreeBuilder::markup();
    let item = |i: usize| {
        builder
            .make("li")
            .build(content![Content::attrs([("n", i)]), i * 2], [("class", "row")])
            .unwrap()
    };

    // Act
    let parallel: Vec<Markup> = (0..64).into_par_iter().map(item).collect();
    let sequential: Vec<Markup> = (0..64).map(item).collect();

    // Assert
    assert_eq!(parallel, sequential);
    assert_eq!(parallel[3].as_str(), r#"<li class="row" n="3">6</li>"#);
}

#[test]
fn given_backend_in_arc_when_builders_on_threads_then_each_builds_independently() {
    // Arrange
    init_test_setup();
    let backend = Arc::new(MarkupBackend::default());

    // Act
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let builder = TreeBuilder::new(Arc::clone(&backend));
            std::thread::spawn(move || builder.make("p").call(content![i]).unwrap())
        })
        .collect();
    let results: Vec<Markup> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    // Assert
    let expected: Vec<Markup> = (0..4)
        .map(|i| Markup::raw(format!("<p>{}</p>", i)))
        .collect();
    assert_eq!(results, expected);
}
