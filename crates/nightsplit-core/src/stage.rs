use std::fmt;

/// Canonical sleep stage every device label is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    Asleep,
    Light,
    Deep,
    Rem,
    #[default]
    Wake,
}

impl Stage {
    /// All stages, in the order durations are reported.
    pub const ALL: [Stage; 5] = [
        Stage::Asleep,
        Stage::Light,
        Stage::Deep,
        Stage::Rem,
        Stage::Wake,
    ];

    /// Map a raw export label onto the canonical taxonomy.
    ///
    /// Unknown labels become [`Stage::Wake`].
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Core" => Stage::Light,
            "Asleep" => Stage::Asleep,
            "Deep" => Stage::Deep,
            "REM" => Stage::Rem,
            "Awake" | "InBed" => Stage::Wake,
            _ => Stage::Wake,
        }
    }

    pub fn is_wake(self) -> bool {
        matches!(self, Stage::Wake)
    }

    /// Label used in the hypnogram column.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Asleep => "Asleep",
            Stage::Light => "Light",
            Stage::Deep => "Deep",
            Stage::Rem => "REM",
            Stage::Wake => "WAKE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_known_labels() {
        assert_eq!(Stage::from_raw("Core"), Stage::Light);
        assert_eq!(Stage::from_raw("Asleep"), Stage::Asleep);
        assert_eq!(Stage::from_raw("Deep"), Stage::Deep);
        assert_eq!(Stage::from_raw("REM"), Stage::Rem);
        assert_eq!(Stage::from_raw("Awake"), Stage::Wake);
        assert_eq!(Stage::from_raw("InBed"), Stage::Wake);
    }

    #[test]
    fn test_unknown_labels_default_to_wake() {
        for raw in ["", "core", "rem", "Light", "Unspecified", "Asleep "] {
            assert_eq!(Stage::from_raw(raw), Stage::Wake, "label {:?}", raw);
        }
    }

    #[test]
    fn test_hypnogram_labels() {
        let labels: Vec<String> = Stage::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["Asleep", "Light", "Deep", "REM", "WAKE"]);
    }
}
