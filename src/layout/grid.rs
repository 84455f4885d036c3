// Row-wrapping grid packer.
//
// Places measured cards left-to-right in catalog order, wrapping every
// `max_per_row` items. Used by the home, search and discography views.
//
// Wrap semantics are pinned by the frontend: when an item wraps, the row
// max height is assigned the wrapping item's own height, not reset to zero.
// Preserved exactly (see DESIGN.md).

use std::collections::HashMap;

use crate::view::NodeId;

use super::{GridParams, PointF, RectF, SizeF};

/// Result of a grid packing run.
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub positions: HashMap<NodeId, PointF>,
    /// Bounding extent of all placed items. Zero-sized at the origin when
    /// the input is empty.
    pub extent: RectF,
}

/// Pack `items` (id + measured size, already in display order) into rows.
/// Positions are top-left corners.
pub fn pack_grid(items: &[(NodeId, SizeF)], params: &GridParams) -> GridLayout {
    let per_row = params.max_per_row.max(1);

    let mut positions = HashMap::with_capacity(items.len());
    let mut extent: Option<RectF> = None;

    let mut x = params.origin.x;
    let mut y = params.origin.y;
    let mut row_max_h = 0.0f64;

    for (index, (id, size)) in items.iter().enumerate() {
        if index > 0 && index % per_row == 0 {
            y += row_max_h + params.y_gap;
            x = params.origin.x;
            // Assigned, not zeroed: the wrapping item seeds the new row.
            row_max_h = size.h;
        } else {
            row_max_h = row_max_h.max(size.h);
        }

        positions.insert(id.clone(), PointF { x, y });

        let item_rect = RectF::new(x, y, size.w, size.h);
        extent = Some(match extent {
            Some(current) => current.union(&item_rect),
            None => item_rect,
        });

        x += size.w + params.x_gap;
    }

    GridLayout {
        positions,
        extent: extent.unwrap_or(RectF::new(params.origin.x, params.origin.y, 0.0, 0.0)),
    }
}
