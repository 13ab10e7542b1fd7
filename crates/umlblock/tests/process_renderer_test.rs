//! Integration tests for the out-of-process renderer.
//!
//! A fake `bin/java` shell script stands in for the Java runtime so the real
//! spawn, pipe and exit-status handling is exercised without PlantUML.

#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tempfile::{TempDir, tempdir};

use umlblock::{
    BlockProcessor, RenderError, UmlBlockError,
    attributes::Attributes,
    config::{AppConfig, DocumentConfig, RenderStrategy, RendererConfig},
    render::{ProcessRenderer, Renderer},
    transform::DiagramBlock,
};

/// Writing a script while another thread forks can leave the script busy
/// when it is executed, so tests that spawn run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Creates a Java home whose `bin/java` runs `script` under `/bin/sh`.
fn fake_java_home(script: &str) -> TempDir {
    let home = tempdir().expect("Failed to create temp directory");
    let bin = home.path().join("bin");
    fs::create_dir(&bin).unwrap();

    let java = bin.join("java");
    fs::write(&java, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();
    home
}

fn renderer_for(home: &Path) -> ProcessRenderer {
    ProcessRenderer::new(Some(home.to_path_buf()), "plantuml.jar")
}

#[test]
fn test_source_is_piped_to_stdin() {
    let _serial = serial();
    let home = fake_java_home("cat");
    let renderer = renderer_for(home.path());

    let output = renderer.render("@startuml\nA -> B\n@enduml", None).unwrap();
    assert_eq!(output, b"@startuml\nA -> B\n@enduml");
}

#[test]
fn test_command_line_flags() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\nprintf '%s ' \"$@\"");
    let renderer = renderer_for(home.path());

    let output = renderer.render("@startuml\n@enduml", Some("-tsvg")).unwrap();
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "-jar plantuml.jar -charset UTF-8 -failonerror -pipe -tsvg "
    );
}

#[test]
fn test_stdout_and_stderr_are_combined() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\nprintf out\nprintf err >&2");
    let renderer = renderer_for(home.path());

    let output = renderer.render("@startuml\n@enduml", None).unwrap();
    assert_eq!(output, b"outerr");
}

#[test]
fn test_non_zero_exit_is_render_error() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\necho 'Syntax Error?' >&2\nexit 1");
    let renderer = renderer_for(home.path());

    let err = renderer.render("@startuml\nA -> \n@enduml", None).unwrap_err();
    assert!(err.to_string().contains('1'), "Unexpected message: {err}");
    match err {
        UmlBlockError::Render(render_err) => assert_eq!(render_err.exit_code(), Some(1)),
        other => panic!("Expected Render error, got {other:?}"),
    }
}

#[test]
fn test_engine_exiting_early_is_reported_by_status() {
    let _serial = serial();
    // Exits without reading stdin at all
    let home = fake_java_home("exit 3");
    let renderer = renderer_for(home.path());

    let source = format!("@startuml\n{}\n@enduml", "A -> B\n".repeat(100_000));
    let err = renderer.render(&source, None).unwrap_err();
    assert!(matches!(
        err,
        UmlBlockError::Render(RenderError::Exit { code: 3 })
    ));
}

#[test]
fn test_timeout_kills_engine() {
    let _serial = serial();
    let home = fake_java_home("exec sleep 30");
    let renderer = renderer_for(home.path()).with_timeout(Duration::from_millis(200));

    let err = renderer.render("@startuml\n@enduml", None).unwrap_err();
    assert!(matches!(
        err,
        UmlBlockError::Render(RenderError::Timeout(_))
    ));
}

#[test]
fn test_sub_second_configured_timeout_allows_fast_engine() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\nsleep 0.1\nprintf ok");
    let config = RendererConfig::new(RenderStrategy::Process, "plantuml.jar")
        .with_java_home(home.path())
        .with_timeout(Duration::from_millis(900));
    assert_eq!(config.timeout(), Some(Duration::from_millis(900)));

    let renderer = ProcessRenderer::from_config(&config);
    let output = renderer.render("@startuml\n@enduml", None).unwrap();
    assert_eq!(output, b"ok");
}

#[test]
fn test_missing_executable_is_spawn_error() {
    let _serial = serial();
    let home = tempdir().unwrap();
    let renderer = renderer_for(home.path());

    let err = renderer.render("@startuml\n@enduml", None).unwrap_err();
    assert!(matches!(err, UmlBlockError::Render(RenderError::Spawn(_))));
}

#[test]
fn test_failed_render_writes_no_image() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\nexit 1");
    let images = tempdir().unwrap();
    let config = AppConfig::new(
        RendererConfig::default(),
        DocumentConfig::new(Some(images.path().to_path_buf())),
    );
    let processor = BlockProcessor::with_renderer(config, Box::new(renderer_for(home.path())));

    let block = DiagramBlock::new("A -> B", Attributes::new());
    assert!(processor.process(block).is_err());
    assert_eq!(fs::read_dir(images.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_java_home_fails_before_spawn_or_write() {
    let _serial = serial();
    let images = tempdir().unwrap();
    let config = AppConfig::new(
        RendererConfig::default(),
        DocumentConfig::new(Some(images.path().to_path_buf())),
    );
    let renderer = ProcessRenderer::new(None, "plantuml.jar");
    let processor = BlockProcessor::with_renderer(config, Box::new(renderer));

    let block = DiagramBlock::new("A -> B", [("target", "x.png")].into_iter().collect());
    let err = processor.process(block).unwrap_err();

    assert!(matches!(err, UmlBlockError::Config(_)));
    assert!(!images.path().join("x.png").exists());
}

#[test]
fn test_text_art_through_process() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\nprintf 'A -> B'");
    let processor = BlockProcessor::with_renderer(
        AppConfig::default(),
        Box::new(renderer_for(home.path())),
    );

    let block = DiagramBlock::new("A -> B", [("format", "utxt")].into_iter().collect());
    let node = processor.process(block).unwrap();
    assert_eq!(node.as_literal().unwrap().content(), "A -> B");
}

#[test]
fn test_svg_image_through_process() {
    let _serial = serial();
    let home = fake_java_home("cat > /dev/null\nprintf '<svg/>'");
    let images = tempdir().unwrap();
    let config = AppConfig::new(
        RendererConfig::default(),
        DocumentConfig::new(Some(images.path().to_path_buf())),
    );
    let processor = BlockProcessor::with_renderer(config, Box::new(renderer_for(home.path())));

    let attributes = Attributes::new().with_positional(["classes.svg", "svg"]);
    let node = processor
        .process(DiagramBlock::new("class A", attributes))
        .unwrap();

    let image = node.as_image().unwrap();
    assert_eq!(image.path(), images.path().join("classes.svg"));
    assert_eq!(fs::read_to_string(image.path()).unwrap(), "<svg/>");
    assert_eq!(image.alt(), "classes");
}
