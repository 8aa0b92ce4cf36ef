//! Static table of Dimension Data API regions.
//!
//! Each region maps a short code such as `dd-na` to the API host serving it.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "dd-na";

/// Vendor tag shared by every public region.
pub const DIMENSION_DATA_VENDOR: &str = "DimensionData";

/// An API endpoint region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    /// Region code (e.g. `dd-eu`)
    pub code: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// API hostname
    pub host: &'static str,
    /// Vendor tag
    pub vendor: &'static str,
}

/// All known regions.
pub const REGIONS: &[Region] = &[
    Region {
        code: "dd-na",
        name: "North America (NA)",
        host: "api-na.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
    Region {
        code: "dd-eu",
        name: "Europe (EU)",
        host: "api-eu.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
    Region {
        code: "dd-au",
        name: "Australia (AU)",
        host: "api-au.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
    Region {
        code: "dd-af",
        name: "Africa (AF)",
        host: "api-af.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
    Region {
        code: "dd-ap",
        name: "Asia Pacific (AP)",
        host: "api-ap.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
    Region {
        code: "dd-latam",
        name: "South America (LATAM)",
        host: "api-latam.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
    Region {
        code: "dd-canada",
        name: "Canada (CA)",
        host: "api-canada.dimensiondata.com",
        vendor: DIMENSION_DATA_VENDOR,
    },
];

impl Region {
    /// Looks up a region by code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRegion`] if the code is not in [`REGIONS`].
    pub fn lookup(code: &str) -> Result<&'static Self> {
        REGIONS
            .iter()
            .find(|region| region.code == code)
            .ok_or_else(|| Error::UnknownRegion(code.to_string()))
    }

    /// The default region (`dd-na`).
    #[must_use]
    pub fn default_region() -> &'static Self {
        &REGIONS[0]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s).copied()
    }
}
