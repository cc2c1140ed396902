//! Type-specific attribute records attached one-to-one to products.
//!
//! Each product type has a `*SpecFields` patch produced by validation and a
//! stored `*Spec` record read back from the database. Patch fields use
//! [`SpecField`]: the outer `None` means the field was not submitted and must
//! be left untouched, `Some(None)` clears it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MakingChargeType, ProductId};

/// Submitted value of a single optional spec attribute.
pub type SpecField<T> = Option<Option<T>>;

/// Validated jewelry attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JewelrySpecFields {
    pub metal_type: SpecField<String>,
    pub purity: SpecField<String>,
    pub gross_weight: SpecField<f64>,
    pub net_weight: SpecField<f64>,
    pub stone_weight: SpecField<f64>,
    pub making_charge: SpecField<f64>,
    pub making_charge_type: SpecField<MakingChargeType>,
    /// Hallmark unique identification, at most six characters.
    pub huid: SpecField<String>,
    pub size: SpecField<String>,
}

impl JewelrySpecFields {
    pub fn is_empty(&self) -> bool {
        self.metal_type.is_none()
            && self.purity.is_none()
            && self.gross_weight.is_none()
            && self.net_weight.is_none()
            && self.stone_weight.is_none()
            && self.making_charge.is_none()
            && self.making_charge_type.is_none()
            && self.huid.is_none()
            && self.size.is_none()
    }
}

/// Validated watch attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchSpecFields {
    pub brand: SpecField<String>,
    pub model_number: SpecField<String>,
    pub movement_type: SpecField<String>,
    pub case_material: SpecField<String>,
    pub case_size_mm: SpecField<f64>,
    pub strap_material: SpecField<String>,
    pub dial_color: SpecField<String>,
    pub water_resistance_m: SpecField<f64>,
    pub warranty_months: SpecField<i32>,
}

impl WatchSpecFields {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model_number.is_none()
            && self.movement_type.is_none()
            && self.case_material.is_none()
            && self.case_size_mm.is_none()
            && self.strap_material.is_none()
            && self.dial_color.is_none()
            && self.water_resistance_m.is_none()
            && self.warranty_months.is_none()
    }
}

/// Validated loose-diamond attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiamondSpecFields {
    pub shape: SpecField<String>,
    pub carat: SpecField<f64>,
    pub cut: SpecField<String>,
    pub color: SpecField<String>,
    pub clarity: SpecField<String>,
    pub certification_lab: SpecField<String>,
    pub certificate_number: SpecField<String>,
    pub polish: SpecField<String>,
    pub symmetry: SpecField<String>,
    pub fluorescence: SpecField<String>,
}

impl DiamondSpecFields {
    pub fn is_empty(&self) -> bool {
        self.shape.is_none()
            && self.carat.is_none()
            && self.cut.is_none()
            && self.color.is_none()
            && self.clarity.is_none()
            && self.certification_lab.is_none()
            && self.certificate_number.is_none()
            && self.polish.is_none()
            && self.symmetry.is_none()
            && self.fluorescence.is_none()
    }
}

/// Stored jewelry spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JewelrySpec {
    pub product_id: ProductId,
    pub metal_type: Option<String>,
    pub purity: Option<String>,
    pub gross_weight: Option<f64>,
    pub net_weight: Option<f64>,
    pub stone_weight: Option<f64>,
    pub making_charge: Option<f64>,
    pub making_charge_type: Option<MakingChargeType>,
    pub huid: Option<String>,
    pub size: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Stored watch spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchSpec {
    pub product_id: ProductId,
    pub brand: Option<String>,
    pub model_number: Option<String>,
    pub movement_type: Option<String>,
    pub case_material: Option<String>,
    pub case_size_mm: Option<f64>,
    pub strap_material: Option<String>,
    pub dial_color: Option<String>,
    pub water_resistance_m: Option<f64>,
    pub warranty_months: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Stored diamond spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiamondSpec {
    pub product_id: ProductId,
    pub shape: Option<String>,
    pub carat: Option<f64>,
    pub cut: Option<String>,
    pub color: Option<String>,
    pub clarity: Option<String>,
    pub certification_lab: Option<String>,
    pub certificate_number: Option<String>,
    pub polish: Option<String>,
    pub symmetry: Option<String>,
    pub fluorescence: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated spec patch of one product type, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedSpec {
    Jewelry(JewelrySpecFields),
    Watch(WatchSpecFields),
    Diamond(DiamondSpecFields),
}

/// Whichever spec record a product owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductSpec {
    Jewelry(JewelrySpec),
    Watch(WatchSpec),
    Diamond(DiamondSpec),
}
