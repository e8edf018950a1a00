use std::fmt::Write as _;

use crate::procurement::desk::model::DOCUMENT_COUNT;
use crate::procurement::desk::report::InventoryStats;

/// Capabilities listed at the bottom of the system report.
const CAPABILITIES: [&str; 6] = [
    "CAS-based material identification",
    "11-document compliance tracking",
    "Supplier portal simulation",
    "R&D sample request automation",
    "Price vs compliance analysis",
    "Multi-supplier comparison",
];

/// Plain-text system report.
pub fn render_system_report(stats: &InventoryStats, generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AGENTIC PROCUREMENT SYSTEM REPORT");
    let _ = writeln!(out, "Generated: {generated_at}");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out);
    let _ = writeln!(out, "INVENTORY OVERVIEW:");
    let _ = writeln!(out, "- Total Materials: {}", stats.total_materials);
    let _ = writeln!(out, "- Unique CAS Numbers: {}", stats.unique_cas);
    let _ = writeln!(out, "- Unique Suppliers: {}", stats.unique_suppliers);
    let _ = writeln!(out, "- Average Price: ${:.2}", stats.average_price);
    let _ = writeln!(out);
    let _ = writeln!(out, "COMPLIANCE STATUS:");
    let _ = writeln!(
        out,
        "- Ready for R&D: {} ({:.1}%)",
        stats.ready_for_rd,
        stats.ready_percentage()
    );
    let _ = writeln!(
        out,
        "- Average Compliance Score: {:.1}/{DOCUMENT_COUNT} documents",
        stats.average_compliance
    );
    let _ = writeln!(out, "- Materials Needing Documents: {}", stats.needing_documents());
    let _ = writeln!(out);
    let _ = writeln!(out, "COST ANALYSIS:");
    let _ = writeln!(
        out,
        "- Price Range: ${:.2} - ${:.2}",
        stats.min_price, stats.max_price
    );
    let _ = writeln!(
        out,
        "- Materials with Multiple Suppliers: {}",
        stats.multi_supplier_materials
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "SYSTEM CAPABILITIES DEMONSTRATED:");
    for capability in CAPABILITIES {
        let _ = writeln!(out, "[x] {capability}");
    }
    out
}
