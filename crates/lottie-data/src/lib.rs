// lottie-data: Serde view over Lottie document headers and paint vocabulary
pub mod model;

#[cfg(test)]
mod tests {
    use super::model::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal() {
        let data = json!({
            "v": "5.5.2",
            "ip": 0,
            "op": 60,
            "fr": 60,
            "w": 500,
            "h": 500,
            "layers": []
        });
        let header = LottieHeader::from_value(&data).unwrap();
        assert_eq!(header.w, 500.0);
        assert_eq!(header.v.as_deref(), Some("5.5.2"));
        assert!(header.layers.is_empty());
    }

    #[test]
    fn test_missing_ip_defaults_to_zero() {
        let data = json!({ "op": 90, "fr": 30, "w": 256, "h": 256 });
        let header = LottieHeader::from_value(&data).unwrap();
        assert_eq!(header.ip, 0.0);
        assert_eq!(header.total_frames(), 90.0);
        assert!((header.duration_seconds() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_layer_headers_ignore_shape_trees() {
        let data = json!({
            "ip": 0, "op": 60, "fr": 60, "w": 100, "h": 100,
            "layers": [
                {
                    "ty": 4,
                    "nm": "MyShape",
                    "hd": true,
                    "shapes": [
                        { "ty": "fl", "c": { "a": 0, "k": [1, 0, 0, 1] } }
                    ]
                },
                { "ty": 3 }
            ]
        });
        let header = LottieHeader::from_value(&data).unwrap();
        assert_eq!(header.layers.len(), 2);
        assert_eq!(header.layers[0].nm.as_deref(), Some("MyShape"));
        assert!(!header.layers[0].is_visible());
        assert_eq!(header.layers[0].type_name(), "shape");
        assert!(header.layers[1].is_visible());
        assert_eq!(header.layers[1].type_name(), "null");
    }

    #[test]
    fn test_paint_type_tags() {
        assert_eq!(PaintType::of_node(&json!({ "ty": "gf" })), Some(PaintType::GradientFill));
        assert_eq!(PaintType::of_node(&json!({ "ty": "gr" })), None);
        assert_eq!(PaintType::of_node(&json!({ "ty": 4 })), None);
        assert_eq!(PaintType::from_tag("st"), Some(PaintType::Stroke));
    }
}
