//! Dynamic vertical-flow layout.
//!
//! A template page is designed with fixed boxes, but tables only learn their
//! row count at render time. [`compute_layout_plan`] grows or shrinks each
//! variable-height field to fit its rows and pushes every field below it by
//! the same amount. It never paginates: content that ends below the usable
//! height only sets [`LayoutPlan::overflow`].

pub mod config;
pub mod engine;
pub mod error;
pub mod plan;

pub use config::LayoutConfig;
pub use engine::compute_layout_plan;
pub use error::LayoutError;
pub use plan::{FieldPlacement, LayoutPlan, RowCounts, RowMetrics};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sablon_template::{Anchor, Field, FieldKind, FieldStyle, Schema, TableStyle};
    use sablon_types::{Point, Size};

    const PAGE: f32 = 800.0;

    fn table(name: &str, y: f32, declared_height: f32, header: f32, row: f32) -> Field {
        Field::new(
            name,
            FieldKind::Table,
            Point::new(20.0, y),
            Size::new(500.0, declared_height),
        )
        .variable_height()
        .with_style(FieldStyle {
            table: Some(TableStyle {
                header_row_height: Some(header),
                data_row_height: Some(row),
                ..TableStyle::default()
            }),
            ..FieldStyle::default()
        })
    }

    fn text(name: &str, y: f32) -> Field {
        Field::new(name, FieldKind::Text, Point::new(20.0, y), Size::new(200.0, 20.0))
    }

    fn rows(name: &str, n: usize) -> RowCounts {
        RowCounts::from([(name.to_string(), n)])
    }

    fn plan(schema: &Schema, counts: &RowCounts) -> LayoutPlan {
        compute_layout_plan(schema, counts, PAGE, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn empty_table_pulls_following_fields_up() {
        let schema = Schema::new(vec![table("items", 0.0, 200.0, 15.0, 15.0), text("total", 220.0)]);
        let plan = plan(&schema, &rows("items", 0));

        assert_eq!(plan.get("items").map(|p| p.height), Some(15.0));
        assert_eq!(plan.get("total").map(|p| p.y), Some(35.0));
    }

    #[test]
    fn ten_rows_shift_by_the_remaining_delta() {
        let schema = Schema::new(vec![table("items", 0.0, 200.0, 15.0, 15.0), text("total", 220.0)]);
        let plan = plan(&schema, &rows("items", 10));

        assert_eq!(plan.get("items").map(|p| p.height), Some(165.0));
        assert_eq!(plan.get("total").map(|p| p.y), Some(185.0));
        assert_eq!(plan.get("total").map(|p| p.shift()), Some(-35.0));
    }

    #[test]
    fn growth_is_monotonic_and_exact() {
        let schema = Schema::new(vec![
            text("a", 0.0),
            table("b", 50.0, 100.0, 18.0, 12.0),
            text("c", 200.0),
        ]);
        let base = plan(&schema, &rows("b", 0));
        let gap0 = base.get("c").unwrap().y - base.get("a").unwrap().y;

        let mut previous_c = base.get("c").unwrap().y;
        for n in 1..=40 {
            let p = plan(&schema, &rows("b", n));
            let c = p.get("c").unwrap().y;
            assert!(c >= previous_c);
            let gap = c - p.get("a").unwrap().y;
            assert_eq!(gap - gap0, n as f32 * 12.0);
            previous_c = c;
        }
    }

    #[test]
    fn fields_above_the_table_never_move() {
        let schema = Schema::new(vec![
            text("below", 400.0),
            table("items", 100.0, 50.0, 10.0, 10.0),
            text("above", 20.0),
        ]);
        let p = plan(&schema, &rows("items", 30));
        assert_eq!(p.get("above").unwrap().y, 20.0);
        assert_eq!(p.get("below").unwrap().y, 400.0 + (310.0 - 50.0));
        let names: Vec<&str> = p.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["below", "items", "above"]);
    }

    #[test]
    fn flow_fields_win_ties_at_the_same_baseline() {
        let schema = Schema::new(vec![
            table("items", 100.0, 20.0, 10.0, 10.0),
            text("caption", 100.0).with_anchor(Anchor::Flow),
            text("sibling", 100.0),
        ]);
        let p = plan(&schema, &rows("items", 5));
        assert_eq!(p.get("caption").unwrap().y, 100.0);
        assert_eq!(p.get("items").unwrap().y, 100.0);
        assert_eq!(p.get("sibling").unwrap().y, 100.0 + 40.0);
    }

    #[test]
    fn consecutive_tables_accumulate_offsets() {
        let schema = Schema::new(vec![
            table("first", 0.0, 100.0, 10.0, 10.0),
            table("second", 120.0, 100.0, 10.0, 10.0),
            text("footer", 240.0),
        ]);
        let counts = RowCounts::from([("first".to_string(), 14), ("second".to_string(), 0)]);
        let p = plan(&schema, &counts);
        assert_eq!(p.get("second").unwrap().y, 170.0);
        assert_eq!(p.get("footer").unwrap().y, 240.0 + 50.0 - 90.0);
    }

    #[test]
    fn config_defaults_apply_and_hidden_header_is_zero() {
        let mut field = table("items", 0.0, 10.0, 0.0, 0.0);
        field.style.table = None;
        let schema = Schema::new(vec![field]);
        let config = LayoutConfig { header_row_height: 20.0, data_row_height: 15.0 };
        let p = compute_layout_plan(&schema, &rows("items", 2), PAGE, &config).unwrap();
        assert_eq!(p.get("items").unwrap().height, 50.0);

        let mut hidden = table("items", 0.0, 10.0, 30.0, 15.0);
        if let Some(t) = hidden.style.table.as_mut() {
            t.show_header = false;
        }
        let p = plan(&Schema::new(vec![hidden]), &rows("items", 2));
        assert_eq!(p.get("items").unwrap().height, 30.0);
    }

    #[test]
    fn overflow_is_flagged_not_fatal() {
        let schema = Schema::new(vec![table("items", 100.0, 100.0, 15.0, 15.0), text("total", 220.0)]);
        let fits = plan(&schema, &rows("items", 5));
        assert!(!fits.overflow);

        let overflowing = plan(&schema, &rows("items", 60));
        assert!(overflowing.overflow);
        assert_eq!(overflowing.content_bottom, 220.0 + (915.0 - 100.0) + 20.0);
        assert_eq!(overflowing.usable_height, PAGE);
    }

    #[test]
    fn plans_are_pure_and_detached_from_the_schema() {
        let mut schema = Schema::new(vec![table("items", 0.0, 200.0, 15.0, 15.0), text("total", 220.0)]);
        let counts = rows("items", 3);
        let first = plan(&schema, &counts);
        let second = plan(&schema, &counts);
        assert_eq!(first, second);

        schema.fields[1].position.y = 999.0;
        assert_eq!(first.get("total").unwrap().declared_y, 220.0);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let schema = Schema::new(vec![text("bad", f32::INFINITY)]);
        assert_eq!(
            compute_layout_plan(&schema, &RowCounts::new(), PAGE, &LayoutConfig::default()),
            Err(LayoutError::InvalidGeometry("bad".into()))
        );
        let schema = Schema::new(vec![table("items", 0.0, 10.0, -1.0, 10.0)]);
        assert!(matches!(
            compute_layout_plan(&schema, &rows("items", 1), PAGE, &LayoutConfig::default()),
            Err(LayoutError::InvalidRowHeight { .. })
        ));
        assert_eq!(
            compute_layout_plan(&Schema::default(), &RowCounts::new(), 0.0, &LayoutConfig::default()),
            Err(LayoutError::InvalidUsableHeight(0.0))
        );
    }

    #[test]
    fn tables_carry_their_row_metrics() {
        let fixed_table = Field::new(
            "summary",
            FieldKind::Table,
            Point::new(0.0, 300.0),
            Size::new(200.0, 60.0),
        );
        let schema = Schema::new(vec![table("items", 0.0, 100.0, 20.0, 12.0), fixed_table, text("note", 400.0)]);
        let p = plan(&schema, &rows("items", 2));

        assert_eq!(
            p.get("items").unwrap().rows,
            Some(RowMetrics { header_height: 20.0, row_height: 12.0 })
        );
        let summary = p.get("summary").unwrap();
        assert_eq!(summary.height, 60.0);
        assert_eq!(
            summary.rows,
            Some(RowMetrics { header_height: 18.0, row_height: 18.0 })
        );
        assert_eq!(p.get("note").unwrap().rows, None);
    }

    #[test]
    fn empty_schema_has_zero_bottom() {
        let p = plan(&Schema::default(), &RowCounts::new());
        assert!(p.is_empty());
        assert_eq!(p.content_bottom, 0.0);
        assert!(!p.overflow);
    }
}
