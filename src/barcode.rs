// src/barcode.rs
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Serialize, Serializer};

use crate::types::RawType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code39,
    Code93,
    Code128,
    Itf,
    Pdf417,
    Aztec,
    DataMatrix,
    Codabar,
    Unknown,
}

impl Symbology {
    pub const SUPPORTED: [Symbology; 12] = [
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::Itf,
        Symbology::Pdf417,
        Symbology::Aztec,
        Symbology::DataMatrix,
        Symbology::Codabar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::Code39 => "Code 39",
            Symbology::Code93 => "Code 93",
            Symbology::Code128 => "Code 128",
            Symbology::Itf => "ITF",
            Symbology::Pdf417 => "PDF417",
            Symbology::Aztec => "Aztec",
            Symbology::DataMatrix => "Data Matrix",
            Symbology::Codabar => "Codabar",
            Symbology::Unknown => "Unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Symbology::Unknown
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Symbology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Every identifier a scanner may report for one symbology.
struct Aliases {
    symbology: Symbology,
    names: &'static [&'static str],
    // Android format codes; each is also accepted as its decimal string.
    codes: &'static [i64],
}

const ALIASES: &[Aliases] = &[
    Aliases {
        symbology: Symbology::Ean13,
        names: &["org.gs1.EAN-13", "ean13"],
        codes: &[32],
    },
    Aliases {
        symbology: Symbology::Ean8,
        names: &["org.gs1.EAN-8", "ean8"],
        codes: &[64],
    },
    Aliases {
        symbology: Symbology::UpcA,
        names: &["upc_a"],
        codes: &[512],
    },
    Aliases {
        symbology: Symbology::UpcE,
        names: &["org.gs1.UPC-E", "upc_e"],
        codes: &[1024],
    },
    Aliases {
        symbology: Symbology::Code39,
        names: &["org.iso.Code39", "org.iso.Code39Mod43", "code39"],
        codes: &[2],
    },
    Aliases {
        symbology: Symbology::Code93,
        names: &["com.intermec.Code93", "code93"],
        codes: &[4],
    },
    Aliases {
        symbology: Symbology::Code128,
        names: &["org.iso.Code128", "code128"],
        codes: &[1],
    },
    Aliases {
        symbology: Symbology::Itf,
        names: &["org.gs1.ITF14", "org.ansi.Interleaved2of5", "itf14"],
        codes: &[128],
    },
    Aliases {
        symbology: Symbology::Pdf417,
        names: &["org.iso.PDF417", "pdf417"],
        codes: &[2048],
    },
    Aliases {
        symbology: Symbology::Aztec,
        names: &["org.iso.Aztec", "aztec"],
        codes: &[4096],
    },
    Aliases {
        symbology: Symbology::DataMatrix,
        names: &["org.iso.DataMatrix", "datamatrix"],
        codes: &[16],
    },
    Aliases {
        symbology: Symbology::Codabar,
        names: &["org.codabar", "codabar"],
        codes: &[8],
    },
];

struct SymbologyTable {
    by_name: HashMap<String, Symbology>,
    by_code: HashMap<i64, Symbology>,
}

static TABLE: LazyLock<SymbologyTable> = LazyLock::new(|| {
    let mut by_name = HashMap::new();
    let mut by_code = HashMap::new();
    for entry in ALIASES {
        for name in entry.names {
            by_name.insert((*name).to_string(), entry.symbology);
        }
        for code in entry.codes {
            by_code.insert(*code, entry.symbology);
            by_name.insert(code.to_string(), entry.symbology);
        }
    }
    SymbologyTable { by_name, by_code }
});

/// Maps a scanner-reported type identifier to its symbology.
///
/// Matching is exact: no trimming, case folding or partial matches. Anything
/// outside the alias table is `Symbology::Unknown`.
pub fn normalize(raw: &RawType) -> Symbology {
    let found = match raw {
        RawType::Text(name) => TABLE.by_name.get(name.as_str()),
        RawType::Code(code) => TABLE.by_code.get(code),
    };
    found.copied().unwrap_or(Symbology::Unknown)
}

/// Every identifier (text and numeric) that resolves to `symbology`.
pub fn aliases_of(symbology: Symbology) -> Vec<RawType> {
    let mut out = Vec::new();
    for entry in ALIASES.iter().filter(|a| a.symbology == symbology) {
        out.extend(entry.names.iter().map(|n| RawType::Text((*n).to_string())));
        for code in entry.codes {
            out.push(RawType::Code(*code));
            out.push(RawType::Text(code.to_string()));
        }
    }
    out
}
