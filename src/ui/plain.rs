//! Plain-text rendering for `--print`
//!
//! Formats one page of results for stdout, without colors or terminal control.

use std::fmt::Write;

use crate::data::geo::{format_distance, format_price_range};
use crate::data::{Business, CategoryFilter};
use crate::pipeline::Page;

fn business_row(out: &mut String, number: usize, business: &Business) {
    let _ = write!(
        out,
        "{:>3}. {:<32} {:<12} {:<5}",
        number,
        business.name,
        business.category.label(),
        format_price_range(business.price_range)
    );
    if let Some(distance) = business.distance {
        let _ = write!(out, " {}", format_distance(distance));
    }
    out.push('\n');
    if let Some(address) = &business.address {
        let _ = writeln!(out, "     {}", address);
    }
}

/// Renders a page of results as text
///
/// # Arguments
/// * `page` - The page to print
/// * `page_size` - Results per page, for numbering rows
/// * `category` - Active category, shown in the header
/// * `stale` - Whether the listings came from an expired cache
pub fn render_page(
    page: &Page<Business>,
    page_size: usize,
    category: CategoryFilter,
    stale: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} results | Page {}/{}",
        category.label(),
        page.total_items,
        page.page,
        page.total_pages
    );
    if stale {
        out.push_str("(using cached data due to connection issues)\n");
    }
    out.push('\n');

    if page.items.is_empty() {
        if page.is_in_range() {
            out.push_str("No businesses match your filters.\n");
        } else {
            let _ = writeln!(out, "Page {} is out of range.", page.page);
        }
        return out;
    }

    let first = (page.page - 1) * page_size;
    for (offset, business) in page.items.iter().enumerate() {
        business_row(&mut out, first + offset + 1, business);
    }
    out
}
