//! Canonical document-details schema
//!
//! Registration offices export the same nineteen fields in two layouts: an
//! all lower-case one and a mixed-case one with its own column order. Both
//! are described here as aliases of one canonical field list, and an
//! uploaded frame is resolved to canonical names once, at load time.

use crate::frame::Frame;
use crate::warning::Warning;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A canonical document-details field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    SroCode,
    InternalDocumentNumber,
    DocNo,
    DocName,
    RegistrationDate,
    SroName,
    MicrNo,
    BankType,
    PartyCode,
    SellerParty,
    PurchaserParty,
    PropertyDescription,
    AreaName,
    ConsiderationAmt,
    MarketValue,
    DateOfExecution,
    StampDutyPaid,
    RegistrationFees,
    Status,
}

impl Field {
    /// Canonical order (that of the lower-case export)
    pub const ALL: [Field; 19] = [
        Field::SroCode,
        Field::InternalDocumentNumber,
        Field::DocNo,
        Field::DocName,
        Field::RegistrationDate,
        Field::SroName,
        Field::MicrNo,
        Field::BankType,
        Field::PartyCode,
        Field::SellerParty,
        Field::PurchaserParty,
        Field::PropertyDescription,
        Field::AreaName,
        Field::ConsiderationAmt,
        Field::MarketValue,
        Field::DateOfExecution,
        Field::StampDutyPaid,
        Field::RegistrationFees,
        Field::Status,
    ];

    /// Canonical lower-case column name
    pub fn name(self) -> &'static str {
        match self {
            Field::SroCode => "srocode",
            Field::InternalDocumentNumber => "internaldocumentnumber",
            Field::DocNo => "docno",
            Field::DocName => "docname",
            Field::RegistrationDate => "registrationdate",
            Field::SroName => "sroname",
            Field::MicrNo => "micrno",
            Field::BankType => "bank_type",
            Field::PartyCode => "party_code",
            Field::SellerParty => "sellerparty",
            Field::PurchaserParty => "purchaserparty",
            Field::PropertyDescription => "propertydescription",
            Field::AreaName => "areaname",
            Field::ConsiderationAmt => "consideration_amt",
            Field::MarketValue => "marketvalue",
            Field::DateOfExecution => "dateofexecution",
            Field::StampDutyPaid => "stampdutypaid",
            Field::RegistrationFees => "registrationfees",
            Field::Status => "status",
        }
    }

    /// Column name used by the mixed-case export
    fn mixed_case_alias(self) -> &'static str {
        match self {
            Field::SroCode => "SROCode",
            Field::InternalDocumentNumber => "InternalDocumentNumber",
            Field::DocNo => "DocNo",
            Field::DocName => "DocName",
            Field::RegistrationDate => "RegistrationDate",
            Field::SroName => "SROName",
            Field::SellerParty => "SellerParty",
            Field::PurchaserParty => "PurchaserParty",
            Field::PropertyDescription => "PropertyDescription",
            Field::AreaName => "AreaName",
            Field::MarketValue => "MarketValue",
            Field::DateOfExecution => "DateOfExecution",
            Field::StampDutyPaid => "StampDutyPaid",
            Field::RegistrationFees => "RegistrationFees",
            // exported unchanged by both layouts
            Field::MicrNo
            | Field::BankType
            | Field::PartyCode
            | Field::ConsiderationAmt
            | Field::Status => self.name(),
        }
    }
}

const MIXED_CASE_ORDER: [Field; 19] = [
    Field::SroCode,
    Field::InternalDocumentNumber,
    Field::DocNo,
    Field::DocName,
    Field::RegistrationDate,
    Field::SroName,
    Field::SellerParty,
    Field::PurchaserParty,
    Field::PropertyDescription,
    Field::AreaName,
    Field::ConsiderationAmt,
    Field::MarketValue,
    Field::DateOfExecution,
    Field::StampDutyPaid,
    Field::RegistrationFees,
    Field::Status,
    Field::MicrNo,
    Field::PartyCode,
    Field::BankType,
];

/// A known upstream spreadsheet layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamFormat {
    LowerCase,
    MixedCase,
}

impl UpstreamFormat {
    /// Formats in the order they are tried
    pub const ALL: [UpstreamFormat; 2] = [UpstreamFormat::LowerCase, UpstreamFormat::MixedCase];

    /// Fields in the order this format lays them out
    pub fn layout(self) -> &'static [Field] {
        match self {
            UpstreamFormat::LowerCase => &Field::ALL,
            UpstreamFormat::MixedCase => &MIXED_CASE_ORDER,
        }
    }

    pub fn alias(self, field: Field) -> &'static str {
        match self {
            UpstreamFormat::LowerCase => field.name(),
            UpstreamFormat::MixedCase => field.mixed_case_alias(),
        }
    }

    /// Column names (case-sensitive) a frame must contain to match
    pub fn required_columns(self) -> Vec<&'static str> {
        self.layout().iter().map(|&f| self.alias(f)).collect()
    }
}

/// Resolve a frame against the known formats.
///
/// On a match the returned frame holds exactly the format's columns, in the
/// format's order, renamed to canonical lower-case names. Extra columns are
/// dropped.
pub fn normalize(frame: &Frame) -> Result<(Frame, UpstreamFormat), Warning> {
    for format in UpstreamFormat::ALL {
        let required = format.required_columns();
        if let Some(mut selected) = frame.select(&required) {
            selected.columns = format
                .layout()
                .iter()
                .map(|f| f.name().to_string())
                .collect();
            return Ok((selected, format));
        }
    }

    Err(Warning::SchemaMismatch {
        file: frame.source.clone(),
    })
}

/// The six fields offered by the document-details column selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SearchField {
    DocNo,
    RegistrationDate,
    SellerParty,
    PurchaserParty,
    #[default]
    PropertyDescription,
    DateOfExecution,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        SearchField::DocNo,
        SearchField::RegistrationDate,
        SearchField::SellerParty,
        SearchField::PurchaserParty,
        SearchField::PropertyDescription,
        SearchField::DateOfExecution,
    ];

    /// Label shown to the operator
    pub fn label(self) -> &'static str {
        match self {
            SearchField::DocNo => "DocNo",
            SearchField::RegistrationDate => "RegistrationDate",
            SearchField::SellerParty => "SellerParty",
            SearchField::PurchaserParty => "PurchaserParty",
            SearchField::PropertyDescription => "PropertyDescription",
            SearchField::DateOfExecution => "DateOfExecution",
        }
    }

    pub fn field(self) -> Field {
        match self {
            SearchField::DocNo => Field::DocNo,
            SearchField::RegistrationDate => Field::RegistrationDate,
            SearchField::SellerParty => Field::SellerParty,
            SearchField::PurchaserParty => Field::PurchaserParty,
            SearchField::PropertyDescription => Field::PropertyDescription,
            SearchField::DateOfExecution => Field::DateOfExecution,
        }
    }

    /// Canonical column the selector resolves to in a normalized frame
    pub fn column(self) -> &'static str {
        self.field().name()
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchField {
    type Err = String;

    /// Accepts a label in any case, e.g. `propertydescription`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchField::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let labels: Vec<&str> = SearchField::ALL.iter().map(|f| f.label()).collect();
                format!("unknown column '{}', expected one of: {}", s, labels.join(", "))
            })
    }
}
