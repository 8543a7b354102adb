use swim_parser::{Child, Config, Document, Error, Extractor, Registry, Table};

fn table(rows: &[&[Option<&str>]]) -> Table {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.map(str::to_string)).collect())
        .collect()
}

fn extractor() -> Extractor {
    Extractor::new(Registry::default(), Config::default())
}

#[test]
fn monthly_calendar_page() {
    let calendar = table(&[
        &[Some("Swim Team - February 2026"), None, None, None, None],
        &[
            Some("Monday"),
            Some("Tuesday"),
            Some("Wednesday"),
            Some("Thursday"),
            Some("Friday"),
        ],
        &[
            Some("26\nJUN2 6-7:30PM MICC"),
            Some("27"),
            Some("28"),
            Some("29"),
            Some("30\nJUN1 R 5-6PM MW"),
        ],
        &[
            Some("2"),
            Some("3"),
            Some("4"),
            Some("5"),
            Some("6"),
        ],
        &[
            Some("JUN2 6-7:30PM MICC\nJUN1 R 5-6PM MW"),
            Some("J U N 1  B  5 - 6 : 3 0 P M  B A C"),
            Some("JUN2 OFF"),
            Some("Senior 6-8PM MICC"),
            Some("JUN1 R 11-12:30P MW"),
        ],
        &[Some("9"), Some("10"), Some("11"), Some("12"), Some("13")],
        &[Some("JUN2 6-7:30PM MICC"), None, None, None, Some("")],
    ]);

    let document = Document {
        tables: vec![calendar],
        text: Vec::new(),
    };

    let events = extractor().extract(&document).unwrap();
    let summary: Vec<(Child, &str, &str, &str)> = events
        .iter()
        .map(|e| (e.child, e.date.as_str(), e.time.as_str(), e.location.code.as_str()))
        .collect();

    assert_eq!(
        summary,
        [
            (Child::Liza, "Feb 2, 2026", "5:00 PM - 6:00 PM", "MW"),
            (Child::Nastya, "Feb 2, 2026", "6:00 PM - 7:30 PM", "MICC"),
            (Child::Sonya, "Feb 3, 2026", "5:00 PM - 6:30 PM", "BAC"),
            (Child::Liza, "Feb 6, 2026", "11:00 AM - 12:30 PM", "MW"),
            (Child::Nastya, "Feb 9, 2026", "6:00 PM - 7:30 PM", "MICC"),
        ]
    );

    let first = &events[1];
    assert_eq!(first.team, "JUN2");
    assert_eq!(first.location.name, "Mercer Island Country Club");
    assert_eq!(first.title, "Nastya @ MICC 6:00 PM - 7:30 PM");
}

#[test]
fn unrelated_tables_do_not_fail_extraction() {
    let legend = table(&[
        &[Some("Code"), Some("Pool")],
        &[Some("MICC"), Some("Mercer Island Country Club")],
        &[Some("MW"), Some("Mary Wayte")],
    ]);
    let calendar = table(&[
        &[Some("Monday"), Some("Tuesday")],
        &[Some("1"), Some("2")],
        &[Some("JUN2 6-7:30PM MICC"), Some("JUN1 R 11-12:30P MW")],
    ]);

    let document = Document {
        tables: vec![legend, Vec::new(), calendar],
        text: Vec::new(),
    };

    let events = extractor().extract(&document).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].child, Child::Nastya);
    assert_eq!(events[0].date, "Feb 1, 2026");
    assert_eq!(events[0].location.code, "MICC");
    assert_eq!(events[1].child, Child::Liza);
    assert_eq!(events[1].date, "Feb 2, 2026");
    assert_eq!(events[1].location.code, "MW");
}

#[test]
fn fallback_month_comes_from_config() {
    let extractor = Extractor::new(
        Registry::default(),
        Config {
            fallback_year: 2025,
            fallback_month: 11,
            ..Config::default()
        },
    );

    let events = extractor.parse_table(&table(&[
        &[Some("Monday"), Some("Tuesday")],
        &[Some("1"), Some("2")],
        &[Some("JUN2 6-7:30PM MICC"), None],
    ]));

    assert_eq!(events[0].date, "Nov 1, 2025");
}

#[test]
fn text_only_document() {
    let document = Document {
        tables: Vec::new(),
        text: vec![
            "February 2026 Practice Schedule\nMonday, Feb 9\nJUN2 6-7:30PM MICC".to_string(),
            "Feb 10\nJUN1 B 5-6PM BAC\nJUN1 R OFF".to_string(),
        ],
    };

    let events = extractor().extract(&document).unwrap();
    let summary: Vec<(Child, &str)> = events.iter().map(|e| (e.child, e.date.as_str())).collect();
    assert_eq!(
        summary,
        [(Child::Nastya, "Feb 9, 2026"), (Child::Sonya, "Feb 10, 2026")]
    );
}

#[test]
fn nothing_extracted_is_reported() {
    let err = extractor().extract(&Document::default()).unwrap_err();
    assert!(matches!(err, Error::NoContent));
}

#[test]
fn document_from_json() {
    let document: Document = serde_json::from_str(
        r#"{"tables": [[["Monday", "Tuesday"], ["1", "2"], ["JUN2 6-7:30PM MICC", null]]]}"#,
    )
    .unwrap();

    let events = extractor().extract(&document).unwrap();
    assert_eq!(events.len(), 1);
}
