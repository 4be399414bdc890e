// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::style::RGBColor;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

/// The system under test. Ordering follows the label, so grouped output
/// lists `asp` before `node`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Asp,
    Node,
}

impl Platform {
    /// Platforms in load order. Node runs come first in the combined
    /// dataset, then ASP.NET runs.
    pub const LOAD_ORDER: [Platform; 2] = [Platform::Node, Platform::Asp];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Asp => "asp",
            Platform::Node => "node",
        }
    }

    pub fn colour(self) -> RGBColor {
        match self {
            Platform::Asp => hexcolour!(0x512BD4),
            Platform::Node => hexcolour!(0x68A063),
        }
    }

    /// Filename prefix of a run export for the given endpoint, eg:
    /// `upload-test-node-`.
    pub fn file_prefix(self, endpoint: &str) -> String {
        format!("{}-test-{}-", endpoint, self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn labels() {
        assert_eq!(Platform::Node.to_string(), "node");
        assert_eq!(Platform::Asp.as_ref(), "asp");
        assert_eq!(Platform::from_str("node").unwrap(), Platform::Node);
        assert!(Platform::from_str("Node").is_err());
        for platform in Platform::iter() {
            assert_eq!(platform.label(), platform.as_ref());
        }
    }

    #[test]
    fn ordering() {
        assert!(Platform::Asp < Platform::Node);
        assert_eq!(Platform::LOAD_ORDER[0], Platform::Node);
    }

    #[test]
    fn prefix() {
        assert_eq!(Platform::Node.file_prefix("upload"), "upload-test-node-");
        assert_eq!(Platform::Asp.file_prefix("orders"), "orders-test-asp-");
    }

    #[test]
    fn colours() {
        assert_eq!(Platform::Asp.colour(), RGBColor(0x51, 0x2B, 0xD4));
        assert_eq!(Platform::Node.colour(), RGBColor(0x68, 0xA0, 0x63));
    }
}
