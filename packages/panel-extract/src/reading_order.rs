//! Orders detected regions into the sequence a reader would follow.
//!
//! Regions are grouped into rows by vertical overlap: walking regions by
//! vertical centre, a region joins the first row whose anchor (the row's first
//! region) overlaps it, otherwise it starts a new row. Two boxes overlap when
//! either one's vertical centre lies inside the other, so a short balloon next
//! to a tall column shares its row. Rows are read top to bottom. Inside a row,
//! left-to-right pages read by ascending left edge and right-to-left pages by
//! descending right edge. Every remaining tie falls back to detection order, so
//! the same input always yields the same sequence.

use std::cmp::Ordering;

use panel_ocr::{BoundingBox, ReadingDirection, TextRegion};

struct Row {
    anchor: BoundingBox,
    top: f32,
    members: Vec<(usize, TextRegion)>,
}

impl Row {
    fn accepts(&self, bbox: &BoundingBox) -> bool {
        same_row(&self.anchor, bbox)
    }
}

fn spans(bbox: &BoundingBox, y: f32) -> bool {
    y >= bbox.y_min && y <= bbox.y_max
}

fn same_row(a: &BoundingBox, b: &BoundingBox) -> bool {
    spans(a, b.center_y()) || spans(b, a.center_y())
}

pub fn sort_regions(regions: Vec<TextRegion>, direction: ReadingDirection) -> Vec<TextRegion> {
    let mut indexed: Vec<(usize, TextRegion)> = regions.into_iter().enumerate().collect();
    indexed.sort_by(|(ai, a), (bi, b)| {
        a.bounding_box
            .center_y()
            .total_cmp(&b.bounding_box.center_y())
            .then_with(|| a.bounding_box.y_min.total_cmp(&b.bounding_box.y_min))
            .then_with(|| ai.cmp(bi))
    });

    let mut rows: Vec<Row> = Vec::new();
    for (index, region) in indexed {
        match rows.iter_mut().find(|row| row.accepts(&region.bounding_box)) {
            Some(row) => {
                row.top = row.top.min(region.bounding_box.y_min);
                row.members.push((index, region));
            }
            None => rows.push(Row {
                anchor: region.bounding_box,
                top: region.bounding_box.y_min,
                members: vec![(index, region)],
            }),
        }
    }

    rows.sort_by(|a, b| {
        a.top
            .total_cmp(&b.top)
            .then_with(|| first_index(a).cmp(&first_index(b)))
    });

    rows.into_iter()
        .flat_map(|mut row| {
            row.members
                .sort_by(|(ai, a), (bi, b)| compare_in_row(a, b, direction).then_with(|| ai.cmp(bi)));
            row.members.into_iter().map(|(_, region)| region)
        })
        .collect()
}

fn first_index(row: &Row) -> usize {
    row.members.iter().map(|(index, _)| *index).min().unwrap_or(usize::MAX)
}

fn compare_in_row(a: &TextRegion, b: &TextRegion, direction: ReadingDirection) -> Ordering {
    let (a, b) = (&a.bounding_box, &b.bounding_box);
    let horizontal = match direction {
        ReadingDirection::LeftToRight => a.x_min.total_cmp(&b.x_min),
        ReadingDirection::RightToLeft => b.x_max.total_cmp(&a.x_max),
    };
    horizontal.then_with(|| a.y_min.total_cmp(&b.y_min))
}
