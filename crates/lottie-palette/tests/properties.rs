use lottie_palette::codec::{hex_from_rgb8, normalize_hex};
use lottie_palette::compat;
use lottie_palette::extract::ColorKind;
use lottie_palette::gradient::GradientSession;
use lottie_palette::history::{History, MAX_HISTORY};
use lottie_palette::mutate::{apply_color, ColorTarget};
use lottie_palette::theme::{self, ThemeColor};
use lottie_palette::{EditorError, Palette};
use serde_json::{json, Value};

fn solid(ty: &str, rgb: [f64; 3]) -> Value {
    json!({ "ty": ty, "c": { "a": 0, "k": [rgb[0], rgb[1], rgb[2], 1] } })
}

fn rgb_document() -> Value {
    json!({
        "layers": [{
            "ty": 4,
            "shapes": [
                solid("fl", [1.0, 0.0, 0.0]),
                solid("st", [0.0, 1.0, 0.0]),
                solid("fl", [0.0, 0.0, 1.0]),
                solid("st", [1.0, 0.0, 0.0]),
            ]
        }]
    })
}

fn group_hexes(document: &Value) -> Vec<String> {
    Palette::extract(document)
        .groups()
        .map(|group| group.hex.clone())
        .collect()
}

#[test]
fn test_round_trip_idempotence() {
    for r in (0..=255u8).step_by(15) {
        for g in (0..=255u8).step_by(17) {
            for b in [0u8, 1, 127, 128, 254, 255] {
                let hex = hex_from_rgb8([r, g, b]);
                let mut document = json!({ "ty": "fl", "c": { "a": 0, "k": [0, 0, 0, 1] } });
                let palette = Palette::extract(&document);
                apply_color(&mut document, ColorTarget::Site(&palette.sites()[0]), &hex).unwrap();
                assert_eq!(Palette::extract(&document).sites()[0].hex, hex);

                let upper = hex.to_uppercase();
                let palette = Palette::extract(&document);
                apply_color(&mut document, ColorTarget::Site(&palette.sites()[0]), &upper).unwrap();
                assert_eq!(Palette::extract(&document).sites()[0].hex, hex);
            }
        }
    }
}

#[test]
fn test_grouping_is_deterministic() {
    let document = rgb_document();
    let first = Palette::extract(&document);
    let second = Palette::extract(&document);
    let summary = |palette: &Palette| {
        palette
            .groups()
            .map(|group| (group.hex.clone(), group.usage_count()))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&first), summary(&second));
    assert_eq!(
        summary(&first),
        vec![
            ("#ff0000".to_string(), 2),
            ("#00ff00".to_string(), 1),
            ("#0000ff".to_string(), 1),
        ]
    );
}

#[test]
fn test_group_mutation_is_isolated() {
    let mut document = rgb_document();
    let mut palette = Palette::extract(&document);
    let before: Vec<_> = palette.sites().iter().map(|site| site.hex.clone()).collect();

    let group = palette.group_mut("#ff0000").unwrap();
    assert_eq!(apply_color(&mut document, ColorTarget::Group(group), "#abcdef").unwrap(), 2);

    let after: Vec<_> = Palette::extract(&document)
        .sites()
        .iter()
        .map(|site| site.hex.clone())
        .collect();
    for (old, new) in before.iter().zip(&after) {
        if old == "#ff0000" {
            assert_eq!(new, "#abcdef");
        } else {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn test_gradient_stop_floor() {
    let document = json!({ "ty": "gf", "g": { "p": 2, "k": { "a": 0, "k": [0, 1, 0, 0, 1, 0, 0, 1] } } });
    let palette = Palette::extract(&document);
    let mut session = GradientSession::open(&document, palette.group_at(0).unwrap()).unwrap();

    assert!(matches!(
        session.remove_stop(0),
        Err(EditorError::StopFloor { remaining: 2 })
    ));
    assert_eq!(session.stops().len(), 2);

    session.add_stop();
    session.remove_stop(1).unwrap();
    assert_eq!(session.stops().len(), 2);
    assert!(session.remove_stop(1).is_err());
}

#[test]
fn test_history_keeps_most_recent_snapshots() {
    let mut history = History::new();
    history.reset(&json!({ "step": 0 }));
    for step in 1..=(MAX_HISTORY + 10) {
        assert!(history.snapshot(&json!({ "step": step })));
    }
    assert_eq!(history.undo_len(), MAX_HISTORY);
    let steps: Vec<_> = history
        .entries()
        .map(|entry| entry["step"].as_u64().unwrap() as usize)
        .collect();
    let expected: Vec<_> = (11..=(MAX_HISTORY + 10)).collect();
    assert_eq!(steps, expected);
}

#[test]
fn test_undo_never_removes_baseline() {
    let baseline = rgb_document();
    let mut document = baseline.clone();
    let mut history = History::new();
    history.reset(&document);

    for hex in ["#111111", "#222222", "#333333"] {
        let mut palette = Palette::extract(&document);
        let group = palette.groups_mut().next().unwrap();
        apply_color(&mut document, ColorTarget::Group(group), hex).unwrap();
        history.snapshot(&document);
    }

    for _ in 0..10 {
        history.undo(&mut document);
    }
    assert_eq!(history.undo_len(), 1);
    assert_eq!(document, baseline);
    assert!(!history.undo(&mut document));
}

#[test]
fn test_compatibility_concrete_cases() {
    let passing = compat::check(512.0, 512.0, 60.0, 0.0, 150.0);
    assert_eq!(passing.duration_seconds, 2.5);
    assert!(passing.passed());

    let failing = compat::check(256.0, 256.0, 30.0, 0.0, 90.0);
    assert!(!failing.size.passed);
    assert!(!failing.frame_rate.passed);
    assert!(failing.duration.passed);
    assert_eq!(failing.duration_seconds, 3.0);
    assert!(!failing.passed());
}

#[test]
fn test_theme_applies_by_position() {
    let mut document = json!({
        "shapes": [
            solid("fl", [1.0, 0.0, 0.0]),
            solid("fl", [0.0, 1.0, 0.0]),
            solid("fl", [0.0, 0.0, 1.0]),
        ]
    });
    let mut palette = Palette::extract(&document);
    let colors = vec![
        ThemeColor { hex: "#0000FF".to_string(), usage_count: 1 },
        ThemeColor { hex: "#00FF00".to_string(), usage_count: 1 },
    ];
    theme::apply(&mut document, &mut palette, &colors).unwrap();

    let by_position: Vec<_> = Palette::extract(&document)
        .sites()
        .iter()
        .map(|site| site.hex.clone())
        .collect();
    assert_eq!(by_position, vec!["#0000ff", "#00ff00", "#0000ff"]);
    assert_eq!(group_hexes(&document), vec!["#0000ff", "#00ff00"]);
}

#[test]
fn test_solid_and_gradient_on_one_node() {
    let document = json!({
        "ty": "fl",
        "c": { "a": 0, "k": [1, 0, 0, 1] },
        "g": { "p": 1, "k": [0, 0, 0, 1] },
        "it": [solid("st", [0.0, 1.0, 0.0])]
    });
    let palette = Palette::extract(&document);
    let kinds: Vec<_> = palette.sites().iter().map(|site| site.color_kind()).collect();
    assert_eq!(kinds, vec![ColorKind::Solid, ColorKind::Gradient, ColorKind::Solid]);
    assert_eq!(normalize_hex(&palette.sites()[1].hex).unwrap(), "#0000ff");
}
