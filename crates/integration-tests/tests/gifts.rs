//! Gift tally over the bundled children content file.

use winter_gifts_core::gifts::GiftContent;
use winter_gifts_integration_tests::content_dir;

#[test]
fn test_bundled_content_tally() {
    let json = std::fs::read_to_string(content_dir().join("children.json")).unwrap();
    let content = GiftContent::from_json(&json).unwrap();
    let tally = content.tally().unwrap();

    assert_eq!(tally.total_children(), 10);
    assert_eq!(tally.count_of("Winter boots"), 3);
    assert_eq!(tally.count_of("Sled"), 2);
    assert_eq!(tally.count_of("Warm coat"), 2);
    assert_eq!(tally.count_of("Plush bear"), 2);
    assert_eq!(tally.count_of("Ice skates"), 1);
    assert_eq!(tally.counts().map(|(_, n)| n).sum::<usize>(), 10);

    let report = tally.render();
    assert!(report.starts_with("Gift counts:\n"));
    assert!(report.contains("  Winter boots: 3\n"));
    assert!(report.contains("Total children: 10\n"));
    assert!(report.ends_with("Total cost: 465.00\n"));
}

#[test]
fn test_gifts_are_listed_alphabetically() {
    let content = GiftContent::from_json(
        r#"{ "children": [ { "gift": "Sled" }, { "gift": "Boots" }, { "gift": "Sled" } ] }"#,
    )
    .unwrap();
    let tally = content.tally().unwrap();
    let names: Vec<&str> = tally.counts().map(|(gift, _)| gift).collect();
    assert_eq!(names, ["Boots", "Sled"]);
    assert_eq!(tally.total_cost(), None);
}
