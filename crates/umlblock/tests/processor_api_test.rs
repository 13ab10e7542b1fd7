//! Integration tests for the BlockProcessor API
//!
//! These tests drive the public API with an in-process engine stub.

use std::{fs, io::Write, thread};

use tempfile::tempdir;

use umlblock::{
    BlockProcessor, RenderError, UmlBlockError,
    attributes::Attributes,
    config::{AppConfig, DocumentConfig, RendererConfig},
    digest::digest,
    render::{EmbeddedRenderer, Engine, EngineOptions},
    transform::DiagramBlock,
};

/// Engine stub: text formats echo a fixed picture, images echo the source.
struct StubEngine;

impl Engine for StubEngine {
    fn generate(
        &self,
        source: &str,
        options: &EngineOptions,
        sink: &mut dyn Write,
    ) -> Result<(), RenderError> {
        if source.contains("FAIL") {
            return Err(RenderError::Engine("Syntax Error?".to_string()));
        }
        let output = if options.args().iter().any(|arg| arg == "-tutxt") {
            "A -> B".as_bytes()
        } else {
            source.as_bytes()
        };
        sink.write_all(output)
            .map_err(|err| RenderError::Engine(err.to_string()))
    }
}

fn processor_in(images_dir: &std::path::Path) -> BlockProcessor {
    let config = AppConfig::new(
        RendererConfig::default(),
        DocumentConfig::new(Some(images_dir.to_path_buf())),
    );
    BlockProcessor::with_renderer(config, Box::new(EmbeddedRenderer::new(StubEngine)))
}

#[test]
fn test_png_with_target() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let attributes: Attributes = [("format", "png"), ("target", "foo.png")]
        .into_iter()
        .collect();
    let node = processor
        .process(DiagramBlock::new("anything at all", attributes))
        .unwrap();

    assert!(node.as_image().unwrap().path().ends_with("foo.png"));
}

#[test]
fn test_png_without_target_is_content_addressed() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let attributes: Attributes = [("format", "png")].into_iter().collect();
    let node = processor
        .process(DiagramBlock::new("A->B", attributes))
        .unwrap();

    let expected = format!("{}.png", digest("@startuml\nA->B\n@enduml"));
    let image = node.as_image().unwrap();
    assert_eq!(image.target(), expected);
    assert_eq!(
        fs::read_to_string(dir.path().join(&expected)).unwrap(),
        "@startuml\nA->B\n@enduml"
    );
}

#[test]
fn test_same_source_same_file_name() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let first = processor
        .process(DiagramBlock::new("A->B", Attributes::new()))
        .unwrap();
    let second = processor
        .process(DiagramBlock::new("@startuml\nA->B\n@enduml", Attributes::new()))
        .unwrap();

    assert_eq!(
        first.as_image().unwrap().target(),
        second.as_image().unwrap().target()
    );
}

#[test]
fn test_txt_block_is_literal() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let attributes: Attributes = [("format", "txt")].into_iter().collect();
    let node = processor
        .process(DiagramBlock::new("A -> B", attributes))
        .unwrap();

    assert_eq!(node.as_literal().unwrap().content(), "A -> B");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_engine_failure_aborts_block() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let err = processor
        .process(DiagramBlock::new("FAIL", Attributes::new()))
        .unwrap_err();

    assert!(matches!(err, UmlBlockError::Render(RenderError::Engine(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unsupported_format() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    let attributes: Attributes = [("format", "jpeg")].into_iter().collect();
    let err = processor
        .process(DiagramBlock::new("A -> B", attributes))
        .unwrap_err();

    assert!(matches!(err, UmlBlockError::UnsupportedFormat(_)));
}

#[test]
fn test_processor_is_shareable_across_threads() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());

    thread::scope(|scope| {
        for idx in 0..4 {
            let processor = &processor;
            scope.spawn(move || {
                let target = format!("diagram-{idx}.svg");
                let attributes = Attributes::new().with_positional([target.as_str(), "svg"]);
                processor
                    .process(DiagramBlock::new(format!("A -> B{idx}"), attributes))
                    .unwrap();
            });
        }
    });

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 4);
}

#[test]
fn test_processor_keeps_config() {
    let dir = tempdir().unwrap();
    let processor = processor_in(dir.path());
    assert_eq!(processor.config().document().images_dir(), Some(dir.path()));
}

#[cfg(not(feature = "jvm"))]
#[test]
fn test_embedded_strategy_needs_jvm_feature() {
    use umlblock::config::RenderStrategy;

    let config = AppConfig::new(
        RendererConfig::new(RenderStrategy::Embedded, "plantuml.jar"),
        DocumentConfig::default(),
    );

    let err = BlockProcessor::new(config).err().expect("embedded needs jvm");
    assert!(matches!(err, UmlBlockError::Config(_)));
}
