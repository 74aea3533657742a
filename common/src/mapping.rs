//! Colour mapping metadata: which mapping is active and how to draw its
//! legend.

use crate::snapshot::null_as_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Legend {
    Categorical {
        #[serde(default)]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<LegendItem>,
    },
    Continuous {
        #[serde(default)]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        from: String,
        #[serde(default, deserialize_with = "null_as_default")]
        to: String,
        #[serde(default, deserialize_with = "null_as_default")]
        colors: Vec<String>,
    },
    Note {
        #[serde(default)]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        note: String,
    },
    #[serde(other)]
    None,
}

impl Legend {
    pub fn title(&self) -> Option<&str> {
        match self {
            Legend::Categorical { title, .. }
            | Legend::Continuous { title, .. }
            | Legend::Note { title, .. } => Some(title.as_str()),
            Legend::None => None,
        }
    }
}

/// Mapping section of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingInfo {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub legend: Option<Legend>,
}

/// Entry of `GET /api/mapping/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub key: String,
    pub label: String,
}

/// Body of `GET /api/mapping/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingList {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mappings: Vec<MappingEntry>,
    #[serde(default)]
    pub current: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_legend_decodes() {
        let l: Legend = serde_json::from_str(
            r##"{"type": "categorical", "title": "By type",
                 "items": [{"label": "Regular", "color": "#ffa500"}, {"label": "Uav", "color": "#3f8cff"}]}"##,
        )
        .unwrap();
        let Legend::Categorical { title, items } = &l else {
            panic!("unexpected legend {l:?}");
        };
        assert_eq!(title, "By type");
        assert_eq!(items.len(), 2);
        assert_eq!(l.title(), Some("By type"));
    }

    #[test]
    fn continuous_and_note_legends_decode() {
        let l: Legend = serde_json::from_str(
            r##"{"type": "continuous", "title": "By degree", "from": "low", "to": "high", "colors": ["#e3f2fd", "#0d47a1"]}"##,
        )
        .unwrap();
        assert!(matches!(l, Legend::Continuous { ref colors, .. } if colors.len() == 2));

        let l: Legend =
            serde_json::from_str(r#"{"type": "note", "title": "By id", "note": "stable"}"#).unwrap();
        assert!(matches!(l, Legend::Note { ref note, .. } if note == "stable"));
    }

    #[test]
    fn unknown_legend_type_is_none() {
        let l: Legend = serde_json::from_str(r#"{"type": "none", "title": "Cores"}"#).unwrap();
        assert_eq!(l, Legend::None);
        let l: Legend = serde_json::from_str(r#"{"type": "radial", "title": "x"}"#).unwrap();
        assert_eq!(l, Legend::None);
        assert_eq!(l.title(), None);
    }

    #[test]
    fn mapping_list_decodes() {
        let m: MappingList = serde_json::from_str(
            r#"{"ok": true, "mappings": [{"key": "by_type", "label": "By type"}, {"key": "by_id", "label": "By id"}], "current": "by_id"}"#,
        )
        .unwrap();
        assert!(m.ok);
        assert_eq!(m.mappings.len(), 2);
        assert_eq!(m.current.as_deref(), Some("by_id"));
    }
}
