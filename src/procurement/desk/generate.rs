//! Synthetic material data.
//!
//! Produces a shuffled data set of regular offers plus a few pairs of
//! interchangeable offers (same chemical, identical specs, different
//! suppliers) so that substitution and comparison flows have something to find.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::procurement::desk::config::GeneratorConfig;
use crate::procurement::desk::model::{
    ComplianceDocument, CompliancePackage, Material, TechnicalSpecs,
};

/// Chemicals offered by the synthetic suppliers: CAS number and INCI name.
pub const CATALOG: [(&str, &str); 12] = [
    ("56-81-5", "Glycerin"),
    ("98-92-0", "Niacinamide"),
    ("9067-32-7", "Sodium Hyaluronate"),
    ("59-02-9", "Tocopherol"),
    ("81-13-0", "Panthenol"),
    ("111-01-3", "Squalane"),
    ("69-72-7", "Salicylic Acid"),
    ("77-92-9", "Citric Acid"),
    ("11138-66-2", "Xanthan Gum"),
    ("122-99-6", "Phenoxyethanol"),
    ("1314-13-2", "Zinc Oxide"),
    ("13463-67-7", "Titanium Dioxide"),
];

const COMPANY_STEMS: [&str; 16] = [
    "Apex", "Northwind", "Bluegate", "Crestline", "Evergreen", "Harbor", "Ironleaf", "Lumen",
    "Meridian", "Oakridge", "Pinnacle", "Quartz", "Riverside", "Summit", "Tidewater", "Vantage",
];

const COMPANY_SUFFIXES: [&str; 6] = [
    "Chemicals",
    "Ingredients Ltd",
    "Specialty Inc",
    "Materials Group",
    "Labs LLC",
    "Trading Co",
];

/// Spec sets shared by interchangeable pairs.
pub fn common_specs() -> [TechnicalSpecs; 3] {
    [
        TechnicalSpecs::new(2.7, 310, "6061-T6"),
        TechnicalSpecs::new(7.85, 400, "A36"),
        TechnicalSpecs::new(1.2, 50, "HDPE"),
    ]
}

/// Builds a random generator, deterministic when a seed is given.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generates the synthetic data set described by `config`.
pub fn generate_materials<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Vec<Material> {
    let mut materials = Vec::with_capacity(config.regular_items + config.interchangeable_pairs * 2);

    for _ in 0..config.regular_items {
        let (cas_number, inci_name) = pick_chemical(rng);
        let specs = TechnicalSpecs {
            density: Some(round2(rng.gen_range(0.5..=10.0))),
            tensile_strength: Some(rng.gen_range(50..=800)),
            grade: Some(format!("{}{}", letters(rng, 2, true), digits(rng, 2))),
        };
        let supplier = company_name(rng);
        materials.push(build_material(rng, cas_number, inci_name, supplier, specs, config));
    }

    let shared = common_specs();
    for pair in 0..config.interchangeable_pairs {
        let specs = shared[pair % shared.len()].clone();
        let (cas_number, inci_name) = pick_chemical(rng);
        let first_supplier = company_name(rng);
        let mut second_supplier = company_name(rng);
        while second_supplier == first_supplier {
            second_supplier = company_name(rng);
        }
        for supplier in [first_supplier, second_supplier] {
            materials.push(build_material(
                rng,
                cas_number,
                inci_name,
                supplier,
                specs.clone(),
                config,
            ));
        }
    }

    materials.shuffle(rng);
    debug!(count = materials.len(), "generated synthetic materials");
    materials
}

fn build_material<R: Rng + ?Sized>(
    rng: &mut R,
    cas_number: &str,
    inci_name: &str,
    supplier_name: String,
    technical_specs: TechnicalSpecs,
    config: &GeneratorConfig,
) -> Material {
    let mut compliance_package = CompliancePackage::default();
    for document in ComplianceDocument::ALL {
        compliance_package.set(document, rng.gen_bool(config.document_submission_rate));
    }

    Material {
        sku: format!("SKU-{}-{}", digits(rng, 4), letters(rng, 3, false)),
        cas_number: cas_number.to_string(),
        inci_name: inci_name.to_string(),
        supplier_name,
        price: round2(rng.gen_range(10.0..=500.0)),
        lead_time: rng.gen_range(5..=60),
        days_on_hand: rng.gen_range(1..=30),
        technical_specs,
        compliance_package,
    }
}

fn pick_chemical<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    CATALOG[rng.gen_range(0..CATALOG.len())]
}

fn company_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let stem = COMPANY_STEMS[rng.gen_range(0..COMPANY_STEMS.len())];
    let suffix = COMPANY_SUFFIXES[rng.gen_range(0..COMPANY_SUFFIXES.len())];
    format!("{stem} {suffix}")
}

fn digits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn letters<R: Rng + ?Sized>(rng: &mut R, count: usize, uppercase_only: bool) -> String {
    (0..count)
        .map(|_| {
            let offset = rng.gen_range(0..26u8);
            if uppercase_only || rng.gen_bool(0.5) {
                char::from(b'A' + offset)
            } else {
                char::from(b'a' + offset)
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
