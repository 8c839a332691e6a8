//! Property tests for the apply step.

use proptest::prelude::*;
use retint_color::ConversionTable;
use retint_dom::Document;
use retint_engine::{apply_snapshot, restore_element, ColorSnapshot, FORCED_PROPERTIES};

fn rgb() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| format!("rgb({}, {}, {})", r, g, b))
}

fn snapshot() -> impl Strategy<Value = ColorSnapshot> {
    (rgb(), rgb(), rgb(), rgb(), any::<bool>()).prop_map(|(background, color, border, fill, gradient)| {
        ColorSnapshot {
            background_color: background.clone(),
            color: color.clone(),
            border_colors: [border.clone(), border.clone(), border.clone(), border],
            fill,
            stroke: "none".into(),
            background_image: if gradient {
                format!("linear-gradient(90deg, {}, {})", background, color)
            } else {
                "none".into()
            },
            text_fill_color: color,
        }
    })
}

proptest! {
    #[test]
    fn reapplying_writes_nothing_new(snap in snapshot(), dark in any::<bool>()) {
        let table = if dark { ConversionTable::to_dark() } else { ConversionTable::to_light() };
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div);

        let first = apply_snapshot(&mut doc, div, &snap, &table).unwrap();
        let once = doc.get_attribute(div, "style").map(String::from);
        let second = apply_snapshot(&mut doc, div, &snap, &table).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(doc.get_attribute(div, "style").map(String::from), once);
    }

    #[test]
    fn restore_removes_every_write(snap in snapshot()) {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div);

        let written = apply_snapshot(&mut doc, div, &snap, &ConversionTable::to_dark()).unwrap();
        prop_assert_eq!(restore_element(&mut doc, div).unwrap(), written);
        for property in FORCED_PROPERTIES {
            prop_assert_eq!(doc.style_property(div, property), "");
        }
    }
}
