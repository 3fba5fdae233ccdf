use rowsift_engine::{Cell, CellValue, Column, ColumnModel, Grid, Row};
use rowsift_recon::{HistoryEntryId, Judgment, Recon, ReconCandidate, ReconId};
use rowsift_schema::{EntityRef, ItemExpr, Schema, SchemaError, Statement};

const BASE: &str = "http://catalog.example/entity/";

fn matched_cell(value: &str, entity_id: &str) -> Cell {
    let recon = Recon::new(ReconId(1), HistoryEntryId(1))
        .with_match(ReconCandidate::new(entity_id, value));
    Cell {
        value: CellValue::Text(value.into()),
        recon: Some(recon),
    }
}

fn new_cell(value: &str, recon_id: u64) -> Cell {
    let recon = Recon::new(ReconId(recon_id), HistoryEntryId(1)).with_judgment(Judgment::New);
    Cell {
        value: CellValue::Text(value.into()),
        recon: Some(recon),
    }
}

fn columns(names: &[&str]) -> ColumnModel {
    ColumnModel::new(names.iter().map(|n| Column::new(*n)).collect()).unwrap()
}

fn variable(column: &str) -> ItemExpr {
    ItemExpr::Variable {
        column: column.into(),
    }
}

fn statement(subject: ItemExpr, property: &str, value: ItemExpr) -> Statement {
    Statement {
        subject,
        property: property.into(),
        value,
    }
}

// -------------------------------------------------------------------------
// Matched cells
// -------------------------------------------------------------------------

#[test]
fn matched_cell_resolves_to_candidate_reference() {
    let cols = columns(&["city"]);
    let row = Row::of(vec![matched_cell("Paris", "Q90")]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(
            variable("city"),
            "P31",
            ItemExpr::Constant {
                id: "Q515".into(),
                label: "city".into(),
            },
        )],
    };

    let emitted = schema.evaluate_row(&cols, 0, &row).unwrap();
    assert_eq!(emitted.len(), 1);
    assert_eq!(
        emitted[0].subject,
        EntityRef::existing("Q90", BASE.to_string())
    );
    assert_eq!(emitted[0].subject.iri().unwrap(), format!("{BASE}Q90"));
}

#[test]
fn repeated_evaluation_is_idempotent() {
    let cols = columns(&["city"]);
    let row = Row::of(vec![matched_cell("Paris", "Q90")]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(
            variable("city"),
            "P1",
            ItemExpr::Constant {
                id: "Q1".into(),
                label: "x".into(),
            },
        )],
    };

    let first = schema.evaluate_row(&cols, 0, &row).unwrap();
    let second = schema.evaluate_row(&cols, 0, &row).unwrap();
    assert_eq!(first, second);
}

// -------------------------------------------------------------------------
// New cells share one placeholder per row evaluation
// -------------------------------------------------------------------------

#[test]
fn new_cell_yields_equal_placeholders_across_statements() {
    let cols = columns(&["city"]);
    let row = Row::of(vec![new_cell("Nouville", 7)]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![
            statement(
                variable("city"),
                "P31",
                ItemExpr::Constant {
                    id: "Q515".into(),
                    label: "city".into(),
                },
            ),
            statement(
                variable("city"),
                "P17",
                ItemExpr::Constant {
                    id: "Q142".into(),
                    label: "France".into(),
                },
            ),
        ],
    };

    let emitted = schema.evaluate_row(&cols, 3, &row).unwrap();
    assert_eq!(emitted.len(), 2);
    assert!(emitted[0].subject.is_placeholder());
    assert_eq!(emitted[0].subject, emitted[1].subject);

    if let EntityRef::Placeholder(p) = &emitted[0].subject {
        assert_eq!(p.row, 3);
        assert_eq!(p.column, 0);
        assert_eq!(p.label, "Nouville");
        assert_eq!(p.base_iri, BASE);
    }
}

#[test]
fn placeholders_differ_across_rows_and_columns() {
    let cols = columns(&["city", "country"]);
    let row = Row::of(vec![new_cell("Nouville", 1), new_cell("Nouveau", 2)]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(variable("city"), "P17", variable("country"))],
    };

    let emitted_a = schema.evaluate_row(&cols, 0, &row).unwrap();
    assert_ne!(emitted_a[0].subject, emitted_a[0].value, "column differs");

    let emitted_b = schema.evaluate_row(&cols, 1, &row).unwrap();
    assert_ne!(emitted_a[0].subject, emitted_b[0].subject, "row differs");
}

// -------------------------------------------------------------------------
// Skip locality
// -------------------------------------------------------------------------

#[test]
fn unresolved_cell_skips_only_its_statement() {
    let cols = columns(&["city", "country"]);
    // city reconciled + matched; country unreconciled
    let row = Row::of(vec![matched_cell("Paris", "Q90"), Cell::text("France")]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![
            statement(
                variable("city"),
                "P31",
                ItemExpr::Constant {
                    id: "Q515".into(),
                    label: "city".into(),
                },
            ),
            statement(variable("city"), "P17", variable("country")),
            statement(
                variable("city"),
                "P1448",
                ItemExpr::Constant {
                    id: "Q90".into(),
                    label: "Paris".into(),
                },
            ),
        ],
    };

    let emitted = schema.evaluate_row(&cols, 0, &row).unwrap();
    // statement 2 skipped, 1 and 3 emitted
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0].property, "P31");
    assert_eq!(emitted[1].property, "P1448");
}

#[test]
fn absent_cell_and_unjudged_record_skip() {
    let cols = columns(&["city"]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(
            variable("city"),
            "P31",
            ItemExpr::Constant {
                id: "Q515".into(),
                label: "city".into(),
            },
        )],
    };

    // absent cell
    let absent = Row::new(vec![None]);
    assert!(schema.evaluate_row(&cols, 0, &absent).unwrap().is_empty());

    // record present but judgment none
    let unjudged = Row::of(vec![Cell {
        value: CellValue::Text("Paris".into()),
        recon: Some(Recon::new(ReconId(1), HistoryEntryId(1))),
    }]);
    assert!(schema.evaluate_row(&cols, 0, &unjudged).unwrap().is_empty());
}

#[test]
fn unknown_column_is_fatal_not_skip() {
    let cols = columns(&["city"]);
    let row = Row::of(vec![matched_cell("Paris", "Q90")]);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(
            variable("region"),
            "P31",
            ItemExpr::Constant {
                id: "Q515".into(),
                label: "city".into(),
            },
        )],
    };

    let err = schema.evaluate_row(&cols, 0, &row).unwrap_err();
    assert!(matches!(err, SchemaError::ColumnNotFound(name) if name == "region"));
}

// -------------------------------------------------------------------------
// Grid walk + serialized form
// -------------------------------------------------------------------------

#[test]
fn evaluate_grid_processes_every_row_independently() {
    let cols = columns(&["city"]);
    let rows = vec![
        Row::of(vec![matched_cell("Paris", "Q90")]),
        Row::of(vec![Cell::text("unreconciled")]),
        Row::of(vec![new_cell("Nouville", 9)]),
    ];
    let grid = Grid::new(cols, rows);
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(
            variable("city"),
            "P31",
            ItemExpr::Constant {
                id: "Q515".into(),
                label: "city".into(),
            },
        )],
    };

    let per_row = schema.evaluate_grid(&grid).unwrap();
    assert_eq!(per_row.len(), 3);
    assert_eq!(per_row[0].len(), 1);
    assert!(per_row[1].is_empty(), "skip drops only that row's statement");
    assert_eq!(per_row[2].len(), 1);
    assert!(per_row[2][0].subject.is_placeholder());
}

#[test]
fn schema_round_trips_through_json() {
    let schema = Schema {
        base_iri: BASE.into(),
        statements: vec![statement(
            variable("city"),
            "P17",
            ItemExpr::Constant {
                id: "Q142".into(),
                label: "France".into(),
            },
        )],
    };

    let json = serde_json::to_string(&schema).unwrap();
    let back: Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(back.base_iri, schema.base_iri);
    assert_eq!(back.statements.len(), 1);
    assert!(matches!(
        &back.statements[0].subject,
        ItemExpr::Variable { column } if column == "city"
    ));
}
