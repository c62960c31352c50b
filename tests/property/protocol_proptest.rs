//! Property-based tests for the realtime message set
//!
//! Uses proptest to generate random frames and verify decoding rules

use pixelboard::shared::{ClientMessage, Color};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn test_any_integer_coordinates_decode(x in any::<i64>(), y in any::<i64>(), rgb in any::<[u8; 3]>()) {
        let frame = json!({"type": "mouseDown", "data": {"x": x, "y": y, "color": rgb}}).to_string();
        let parsed = ClientMessage::parse(&frame).unwrap();
        prop_assert_eq!(parsed, ClientMessage::MouseDown { x, y, color: Color(rgb) });
    }

    #[test]
    fn test_color_components_above_255_are_rejected(
        component in 256u32..100_000,
        position in 0usize..3,
    ) {
        let mut color = [0u32; 3];
        color[position] = component;
        let frame = json!({"type": "mouseDown", "data": {"x": 0, "y": 0, "color": color}}).to_string();
        prop_assert!(ClientMessage::parse(&frame).is_err());
    }

    #[test]
    fn test_unknown_tags_are_rejected(tag in "[a-zA-Z]{1,16}") {
        prop_assume!(!["getChunk", "mouseDown", "requestTimeout"].contains(&tag.as_str()));
        let frame = json!({"type": tag, "data": {}}).to_string();
        prop_assert!(ClientMessage::parse(&frame).is_err());
    }
}
