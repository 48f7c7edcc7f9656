//! Android screen density buckets.
//!
//! The catalog is fixed and ordered from lowest to highest density. Each
//! bucket carries its multiplier relative to the `mdpi` baseline.

use std::fmt;

use serde::Serialize;

/// A named screen-density class and its scale relative to `mdpi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Density {
    pub name: &'static str,
    pub multiplier: f64,
}

/// Every density bucket, in catalog order.
pub static DENSITIES: [Density; 5] = [
    Density::MDPI,
    Density::HDPI,
    Density::XHDPI,
    Density::XXHDPI,
    Density::XXXHDPI,
];

impl Density {
    pub const MDPI: Density = Density { name: "mdpi", multiplier: 1.0 };
    pub const HDPI: Density = Density { name: "hdpi", multiplier: 1.5 };
    pub const XHDPI: Density = Density { name: "xhdpi", multiplier: 2.0 };
    pub const XXHDPI: Density = Density { name: "xxhdpi", multiplier: 3.0 };
    pub const XXXHDPI: Density = Density { name: "xxxhdpi", multiplier: 4.0 };

    /// All buckets in catalog order.
    pub fn all() -> &'static [Density] {
        &DENSITIES
    }

    /// Look up a bucket by its exact name.
    pub fn find(name: &str) -> Option<&'static Density> {
        DENSITIES.iter().find(|d| d.name == name)
    }

    /// Resolve the density source images were authored at.
    ///
    /// Absent or unrecognised names fall back to `xxxhdpi`.
    pub fn source_or_default(name: Option<&str>) -> &'static Density {
        name.and_then(Self::find).unwrap_or(&DENSITIES[4])
    }

    /// Name of the resource directory for this bucket, e.g. `drawable-hdpi`.
    pub fn directory(&self) -> String {
        format!("drawable-{}", self.name)
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Which buckets to generate.
///
/// An empty filter selects the whole catalog. A non-empty filter selects
/// exactly the buckets it names; names outside the catalog match nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityFilter {
    names: Vec<String>,
}

impl DensityFilter {
    /// Select every bucket.
    pub fn all() -> Self {
        Self::default()
    }

    /// Select only the named buckets.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.names.is_empty()
    }

    pub fn includes(&self, name: &str) -> bool {
        self.is_all() || self.names.iter().any(|n| n == name)
    }

    /// Selected buckets, in catalog order.
    pub fn selected(&self) -> impl Iterator<Item = &'static Density> + '_ {
        DENSITIES.iter().filter(move |d| self.includes(d.name))
    }

    /// Requested names that are not in the catalog.
    pub fn unknown(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| Density::find(n).is_none())
            .map(String::as_str)
            .collect()
    }
}
