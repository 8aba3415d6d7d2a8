use std::path::{Path, PathBuf};

use cam_renderer::command::DrawCommand;
use cam_renderer::render::{canvas_size, output_size};
use cam_renderer::{
    MapDocument, RenderConfig, RenderError, RenderRequest, Theme, compose, export_png, load_document,
    render_png,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn request(name: &str) -> RenderRequest {
    let document: MapDocument = load_document(&fixture_path(name)).expect("fixture load failed");
    document.into_request(RenderConfig::default(), Theme::default())
}

/// Width and height from the IHDR chunk.
fn png_size(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "not a PNG stream");
    let word = |at: usize| u32::from_be_bytes([png[at], png[at + 1], png[at + 2], png[at + 3]]);
    (word(16), word(20))
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    for name in ["valence.json5", "legacy_columns.json", "vertical.json5"] {
        let request = request(name);
        let png = render_png(&request).unwrap_or_else(|err| panic!("{name}: {err}"));
        let expected = output_size(canvas_size(&request.nodes, &request.config), request.config.scale);
        assert_eq!(png_size(&png), (expected.width, expected.height), "{name}: wrong size");

        let commands = compose(&request).unwrap();
        assert!(commands.iter().all(DrawCommand::is_finite), "{name}: non-finite command");
    }
}

#[test]
fn output_size_follows_largest_position() {
    let png = render_png(&request("valence.json5")).unwrap();
    // floor(1.3 * 5 * 260) / 5, floor(1.3 * 5 * 200) / 5
    assert_eq!(png_size(&png), (338, 260));
}

#[test]
fn rendering_is_deterministic() {
    let request = request("valence.json5");
    assert_eq!(render_png(&request).unwrap(), render_png(&request).unwrap());
}

#[test]
fn final_size_does_not_depend_on_scale() {
    let at5 = request("valence.json5");
    let at10 = at5.clone().with_scale(10.0);
    let canvas5 = canvas_size(&at5.nodes, &at5.config);
    let canvas10 = canvas_size(&at10.nodes, &at10.config);
    assert_eq!(canvas10.width, canvas5.width * 2);
    assert_eq!(canvas10.height, canvas5.height * 2);
    assert_eq!(
        png_size(&render_png(&at5).unwrap()),
        png_size(&render_png(&at10).unwrap())
    );
}

#[test]
fn document_scale_is_honoured() {
    let request = request("legacy_columns.json");
    assert_eq!(request.config.scale, 3.0);
}

#[test]
fn unknown_category_draws_like_ambivalent() {
    let unknown = request("legacy_columns.json");
    let mut ambivalent = unknown.clone();
    ambivalent.nodes[1].valence = cam_renderer::Valence::from_tag("ambivalent");
    assert_eq!(compose(&unknown).unwrap(), compose(&ambivalent).unwrap());
}

#[test]
fn connectors_lie_beneath_boxes() {
    let request = request("valence.json5");
    let commands = compose(&request).unwrap();
    let first_shape = commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Polygon { .. } | DrawCommand::Ellipse { .. }))
        .unwrap();
    assert!(first_shape > 0);
    assert!(commands[..first_shape]
        .iter()
        .all(|c| matches!(c, DrawCommand::Line { .. } | DrawCommand::ArrowedLine { .. })));
    assert!(commands[first_shape..]
        .iter()
        .all(|c| !matches!(c, DrawCommand::Line { .. } | DrawCommand::ArrowedLine { .. })));
}

#[test]
fn dangling_edge_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.png");
    let err = export_png(&request("dangling.json5"), &out).unwrap_err();
    assert!(matches!(err, RenderError::UnresolvedReference { ref node, .. } if node == "99"));
    assert!(!out.exists());
}

#[test]
fn export_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.png");
    std::fs::write(&out, b"stale").unwrap();
    let request = request("vertical.json5");
    export_png(&request, &out).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), render_png(&request).unwrap());
    // only the final file remains, no temp leftovers
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn export_into_missing_directory_is_a_sink_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("map.png");
    let err = export_png(&request("vertical.json5"), &out).unwrap_err();
    assert!(matches!(err, RenderError::Sink { .. }));
}

#[test]
fn independent_renders_run_in_parallel() {
    let requests = [request("valence.json5"), request("vertical.json5")];
    let serial: Vec<Vec<u8>> = requests.iter().map(|r| render_png(r).unwrap()).collect();
    let parallel: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|r| scope.spawn(move || render_png(r).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(serial, parallel);
}
