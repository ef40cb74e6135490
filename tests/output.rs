use taskdash::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("Replayed 3 commands");
    human.push_summary("Applied", "2");
    human.push_detail("task-1 [todo] Ship (high, due 2024-03-01, Ana, 0h)");
    human.push_warning("line 3 (delete): Task not found: task-x");

    let rendered = format_human(&human);
    assert!(rendered.contains("Replayed 3 commands"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- Applied: 2"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- task-1 [todo] Ship"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- line 3 (delete): Task not found: task-x"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("No tasks due");
    let rendered = format_human(&human);
    assert_eq!(rendered, "No tasks due");
}
