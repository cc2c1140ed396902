//! Diesel models for the `*_specs` tables.
//!
//! Every table has three shapes: the queryable row, an insertable row used
//! for the first write, and a changeset applied when the row already exists.
//! Changeset fields are `Option<Option<T>>` so that attributes missing from
//! the submission are left alone.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::spec::{
    DiamondSpec as DomainDiamondSpec, DiamondSpecFields, JewelrySpec as DomainJewelrySpec,
    JewelrySpecFields, WatchSpec as DomainWatchSpec, WatchSpecFields,
};
use crate::domain::types::{MakingChargeType, ProductId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::jewelry_specs)]
pub struct JewelrySpec {
    pub id: i32,
    pub product_id: i32,
    pub metal_type: Option<String>,
    pub purity: Option<String>,
    pub gross_weight: Option<f64>,
    pub net_weight: Option<f64>,
    pub stone_weight: Option<f64>,
    pub making_charge: Option<f64>,
    pub making_charge_type: Option<String>,
    pub huid: Option<String>,
    pub size: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::jewelry_specs)]
pub struct NewJewelrySpec {
    pub product_id: i32,
    pub metal_type: Option<String>,
    pub purity: Option<String>,
    pub gross_weight: Option<f64>,
    pub net_weight: Option<f64>,
    pub stone_weight: Option<f64>,
    pub making_charge: Option<f64>,
    pub making_charge_type: Option<String>,
    pub huid: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::jewelry_specs)]
pub struct JewelrySpecChangeset {
    pub metal_type: Option<Option<String>>,
    pub purity: Option<Option<String>>,
    pub gross_weight: Option<Option<f64>>,
    pub net_weight: Option<Option<f64>>,
    pub stone_weight: Option<Option<f64>>,
    pub making_charge: Option<Option<f64>>,
    pub making_charge_type: Option<Option<String>>,
    pub huid: Option<Option<String>>,
    pub size: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl NewJewelrySpec {
    pub fn new(product_id: ProductId, fields: &JewelrySpecFields) -> Self {
        Self {
            product_id: product_id.get(),
            metal_type: fields.metal_type.clone().flatten(),
            purity: fields.purity.clone().flatten(),
            gross_weight: fields.gross_weight.flatten(),
            net_weight: fields.net_weight.flatten(),
            stone_weight: fields.stone_weight.flatten(),
            making_charge: fields.making_charge.flatten(),
            making_charge_type: fields.making_charge_type.flatten().map(String::from),
            huid: fields.huid.clone().flatten(),
            size: fields.size.clone().flatten(),
        }
    }
}

impl From<&JewelrySpecFields> for JewelrySpecChangeset {
    fn from(fields: &JewelrySpecFields) -> Self {
        Self {
            metal_type: fields.metal_type.clone(),
            purity: fields.purity.clone(),
            gross_weight: fields.gross_weight,
            net_weight: fields.net_weight,
            stone_weight: fields.stone_weight,
            making_charge: fields.making_charge,
            making_charge_type: fields.making_charge_type.map(|v| v.map(String::from)),
            huid: fields.huid.clone(),
            size: fields.size.clone(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<JewelrySpec> for DomainJewelrySpec {
    type Error = TypeConstraintError;

    fn try_from(spec: JewelrySpec) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: spec.product_id.try_into()?,
            metal_type: spec.metal_type,
            purity: spec.purity,
            gross_weight: spec.gross_weight,
            net_weight: spec.net_weight,
            stone_weight: spec.stone_weight,
            making_charge: spec.making_charge,
            making_charge_type: spec
                .making_charge_type
                .map(MakingChargeType::try_from)
                .transpose()?,
            huid: spec.huid,
            size: spec.size,
            created_at: spec.created_at,
            updated_at: spec.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::watch_specs)]
pub struct WatchSpec {
    pub id: i32,
    pub product_id: i32,
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

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::watch_specs)]
pub struct NewWatchSpec {
    pub product_id: i32,
    pub brand: Option<String>,
    pub model_number: Option<String>,
    pub movement_type: Option<String>,
    pub case_material: Option<String>,
    pub case_size_mm: Option<f64>,
    pub strap_material: Option<String>,
    pub dial_color: Option<String>,
    pub water_resistance_m: Option<f64>,
    pub warranty_months: Option<i32>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::watch_specs)]
pub struct WatchSpecChangeset {
    pub brand: Option<Option<String>>,
    pub model_number: Option<Option<String>>,
    pub movement_type: Option<Option<String>>,
    pub case_material: Option<Option<String>>,
    pub case_size_mm: Option<Option<f64>>,
    pub strap_material: Option<Option<String>>,
    pub dial_color: Option<Option<String>>,
    pub water_resistance_m: Option<Option<f64>>,
    pub warranty_months: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

impl NewWatchSpec {
    pub fn new(product_id: ProductId, fields: &WatchSpecFields) -> Self {
        Self {
            product_id: product_id.get(),
            brand: fields.brand.clone().flatten(),
            model_number: fields.model_number.clone().flatten(),
            movement_type: fields.movement_type.clone().flatten(),
            case_material: fields.case_material.clone().flatten(),
            case_size_mm: fields.case_size_mm.flatten(),
            strap_material: fields.strap_material.clone().flatten(),
            dial_color: fields.dial_color.clone().flatten(),
            water_resistance_m: fields.water_resistance_m.flatten(),
            warranty_months: fields.warranty_months.flatten(),
        }
    }
}

impl From<&WatchSpecFields> for WatchSpecChangeset {
    fn from(fields: &WatchSpecFields) -> Self {
        Self {
            brand: fields.brand.clone(),
            model_number: fields.model_number.clone(),
            movement_type: fields.movement_type.clone(),
            case_material: fields.case_material.clone(),
            case_size_mm: fields.case_size_mm,
            strap_material: fields.strap_material.clone(),
            dial_color: fields.dial_color.clone(),
            water_resistance_m: fields.water_resistance_m,
            warranty_months: fields.warranty_months,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<WatchSpec> for DomainWatchSpec {
    type Error = TypeConstraintError;

    fn try_from(spec: WatchSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: spec.product_id.try_into()?,
            brand: spec.brand,
            model_number: spec.model_number,
            movement_type: spec.movement_type,
            case_material: spec.case_material,
            case_size_mm: spec.case_size_mm,
            strap_material: spec.strap_material,
            dial_color: spec.dial_color,
            water_resistance_m: spec.water_resistance_m,
            warranty_months: spec.warranty_months,
            created_at: spec.created_at,
            updated_at: spec.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::diamond_specs)]
pub struct DiamondSpec {
    pub id: i32,
    pub product_id: i32,
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

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::diamond_specs)]
pub struct NewDiamondSpec {
    pub product_id: i32,
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
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::diamond_specs)]
pub struct DiamondSpecChangeset {
    pub shape: Option<Option<String>>,
    pub carat: Option<Option<f64>>,
    pub cut: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub clarity: Option<Option<String>>,
    pub certification_lab: Option<Option<String>>,
    pub certificate_number: Option<Option<String>>,
    pub polish: Option<Option<String>>,
    pub symmetry: Option<Option<String>>,
    pub fluorescence: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl NewDiamondSpec {
    pub fn new(product_id: ProductId, fields: &DiamondSpecFields) -> Self {
        Self {
            product_id: product_id.get(),
            shape: fields.shape.clone().flatten(),
            carat: fields.carat.flatten(),
            cut: fields.cut.clone().flatten(),
            color: fields.color.clone().flatten(),
            clarity: fields.clarity.clone().flatten(),
            certification_lab: fields.certification_lab.clone().flatten(),
            certificate_number: fields.certificate_number.clone().flatten(),
            polish: fields.polish.clone().flatten(),
            symmetry: fields.symmetry.clone().flatten(),
            fluorescence: fields.fluorescence.clone().flatten(),
        }
    }
}

impl From<&DiamondSpecFields> for DiamondSpecChangeset {
    fn from(fields: &DiamondSpecFields) -> Self {
        Self {
            shape: fields.shape.clone(),
            carat: fields.carat,
            cut: fields.cut.clone(),
            color: fields.color.clone(),
            clarity: fields.clarity.clone(),
            certification_lab: fields.certification_lab.clone(),
            certificate_number: fields.certificate_number.clone(),
            polish: fields.polish.clone(),
            symmetry: fields.symmetry.clone(),
            fluorescence: fields.fluorescence.clone(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<DiamondSpec> for DomainDiamondSpec {
    type Error = TypeConstraintError;

    fn try_from(spec: DiamondSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: spec.product_id.try_into()?,
            shape: spec.shape,
            carat: spec.carat,
            cut: spec.cut,
            color: spec.color,
            clarity: spec.clarity,
            certification_lab: spec.certification_lab,
            certificate_number: spec.certificate_number,
            polish: spec.polish,
            symmetry: spec.symmetry,
            fluorescence: spec.fluorescence,
            created_at: spec.created_at,
            updated_at: spec.updated_at,
        })
    }
}
