//! Integration tests for gridvis-core.
//!
//! These tests drive the public API from a host JSON payload to rendered
//! cell text.

use gridvis_core::{
    format_value, normalize, CellValue, Command, DataView, FormattingSettings, GridMode, RawInput,
    RowRecord, Scaling, SettingsIntent, SettingsOverride, SettingsStore, State, StyleFlag, Theme,
    VisualUpdateOptions,
};

const MATRIX_JSON: &str = r#"{
    "dataViews": [{
        "metadata": {"objects": {"visualSettings": {"bold": true, "scaling": "millions"}}},
        "matrix": {
            "rows": {
                "root": {"children": [
                    {"levelValues": [{"value": "North"}], "values": {"0": {"value": 1500000}, "1": {"value": 2300000}}},
                    {"levelValues": [{"value": "South"}], "values": {"0": {"value": 900000}}}
                ]},
                "levels": [{"sources": [{"displayName": "Region"}]}]
            },
            "columns": {"root": {"children": [
                {"levelValues": [{"value": "2023"}]},
                {"levelValues": [{"value": "2024"}]}
            ]}}
        }
    }]
}"#;

#[test]
fn test_matrix_payload_to_cell_text() {
    let options: VisualUpdateOptions = serde_json::from_str(MATRIX_JSON).expect("valid payload");
    let model = normalize(RawInput::detect(options.data_view()));
    assert_eq!(model.mode, GridMode::Hierarchical);
    assert_eq!(model.columns[1].display_label, "2024");

    let south = &model.rows[1];
    assert_eq!(south.group_label(), Some("South"));
    assert_eq!(south.cell(1, &model.columns[1]), Some(&CellValue::Empty));

    let north = model.rows[0].cell(0, &model.columns[0]).expect("cell");
    assert_eq!(format_value(north, Scaling::Millions), "1.50");
}

#[test]
fn test_persisted_object_round_trip() {
    let options: VisualUpdateOptions = serde_json::from_str(MATRIX_JSON).expect("valid payload");
    let view = options.data_view().expect("data view");
    let persisted = view.metadata.object("visualSettings").expect("object");

    let mut store = SettingsStore::default();
    let cmd = store.merge_host_override(SettingsOverride::from_properties(persisted));
    assert!(store.current_settings().bold);
    assert_eq!(store.current_settings().scaling, Scaling::Millions);
    assert!(cmd.persisted().is_some());

    // The host echoes what was persisted on the next update.
    let echoed = SettingsOverride::from_properties(&store.current_settings().persisted().to_properties());
    let cmd = store.merge_host_override(echoed);
    assert!(cmd.persisted().is_none());
}

#[test]
fn test_table_payload_without_matrix() {
    let json = r#"{"table": {"columns": [{"displayName": "Name"}, {"displayName": "Amount"}],
                  "rows": [["Widget", "$1,234.50"], ["Gadget", 17]]}}"#;
    let view: DataView = serde_json::from_str(json).expect("valid table");
    let model = normalize(RawInput::detect(Some(&view)));
    assert_eq!(model.mode, GridMode::Flat);
    assert_eq!(model.row_count(), 2);

    let RowRecord::Flat(row) = &model.rows[0] else {
        panic!("expected flat row");
    };
    let amount = row.get("Amount").expect("amount");
    assert!(!amount.is_numeric());
    assert_eq!(format_value(amount, Scaling::None), "1234.50");
}

#[test]
fn test_reducer_sequence() {
    let mut settings = FormattingSettings::default();
    let intents = [
        SettingsIntent::ToggleStyle(StyleFlag::Bold),
        SettingsIntent::ToggleStyle(StyleFlag::Underline),
        SettingsIntent::SetScaling(Scaling::Auto),
        SettingsIntent::SetTheme(Theme::Dark),
    ];
    let mut persisted = 0;
    for intent in intents {
        let cmd: Command<SettingsIntent> = settings.update(intent);
        if cmd.persisted().is_some() {
            persisted += 1;
        }
    }
    assert_eq!(persisted, 4);
    assert_eq!(settings.active_style(), Some(StyleFlag::Underline));
    assert_eq!(settings.scaling, Scaling::Auto);
    assert_eq!(settings.theme, Theme::Dark);
}
