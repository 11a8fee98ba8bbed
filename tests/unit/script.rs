use super::*;
use crate::assets::source::MemoryAssetSource;
use crate::catalog::Catalog;
use crate::scene::photo::PhotoMask;

fn composer() -> Composer {
    let mut c = Catalog::builtin();
    c.canvas.size = 48;
    c.canvas.photo_mask = PhotoMask::FullCanvas;
    Composer::new(c, MemoryAssetSource::new()).unwrap()
}

#[test]
fn intents_parse_from_tagged_json() {
    let json = r#"{
        "screen": { "left": 0, "top": 0, "width": 540, "height": 540 },
        "intents": [
            { "op": "select_frame", "id": "frame1" },
            { "op": "load_photo", "path": "me.jpg" },
            { "op": "set_zoom", "percent": 150 },
            { "op": "edit_text", "edit": { "field": "bold", "value": false } },
            { "op": "pointer_down", "x": 10, "y": 20.5 },
            { "op": "pointer_up" },
            { "op": "export" }
        ]
    }"#;
    let script = Script::from_json_str(json).unwrap();
    assert_eq!(script.screen.map(|s| s.width), Some(540.0));
    assert_eq!(script.intents.len(), 7);
    assert_eq!(
        script.intents[1],
        Intent::LoadPhoto {
            path: PathBuf::from("me.jpg"),
            mime: None,
        }
    );
    assert_eq!(
        script.intents[3],
        Intent::EditText {
            edit: TextEdit::Bold(false)
        }
    );
    assert_eq!(script.intents[4].name(), "pointer_down");
}

#[test]
fn unknown_op_is_rejected() {
    let err = Script::from_json_str(r#"{ "intents": [ { "op": "crop" } ] }"#).unwrap_err();
    assert!(matches!(err, ComposeError::Other(_)));
}

#[test]
fn replay_records_failures_and_continues() {
    let mut composer = composer();
    let script = Script {
        screen: None,
        intents: vec![
            Intent::SelectFrame {
                id: "nope".to_string(),
            },
            Intent::AddText {
                text: "Hello".to_string(),
            },
            Intent::SetZoom { percent: 400.0 },
            Intent::SetFilter {
                id: "vintage".to_string(),
            },
            Intent::Export,
        ],
    };
    let report = replay(&mut composer, &script, Path::new("."));

    let failed: Vec<_> = report.failures.iter().map(|f| (f.index, f.op)).collect();
    assert_eq!(
        failed,
        vec![(0, "select_frame"), (3, "set_filter"), (4, "export")]
    );
    assert!(matches!(
        report.failures[2].error,
        ComposeError::NothingToExport(_)
    ));
    assert!(report.exports.is_empty());
    assert_eq!(composer.scene().texts().len(), 1);
    assert_eq!(composer.scene().photo_transform.scale, 3.0);
}

#[test]
fn replay_loads_photo_relative_to_base_dir_and_exports() {
    let dir = std::env::temp_dir().join(format!("frame_composer_script_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    image::RgbaImage::from_pixel(20, 10, image::Rgba([10, 200, 10, 255]))
        .save(dir.join("photo.png"))
        .unwrap();

    let mut composer = composer();
    let script = Script::from_json_str(
        r#"{ "intents": [
            { "op": "load_photo", "path": "photo.png" },
            { "op": "set_filter", "id": "mono" },
            { "op": "export" }
        ] }"#,
    )
    .unwrap();
    let report = replay(&mut composer, &script, &dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.exports.len(), 1);
    assert_eq!(report.exports[0].width, 48);
}
