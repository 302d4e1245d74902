//! Project driver tests.

use docscan_options::DocscanConfig;
use docscan_project::{EmitKind, Project, ProjectError, ProjectStats};

fn dojo_config() -> DocscanConfig {
    let mut config = DocscanConfig {
        base_url: "/src/".to_string(),
        ..Default::default()
    };
    config.module_map.insert("dojo".to_string(), "dojo".to_string());
    config
}

#[test]
fn test_reports_keep_input_order() {
    let mut project = Project::new(dojo_config()).with_emit(EmitKind::None);
    for i in 0..32 {
        project.add_source(format!("/src/dojo/m{}.js", i), format!("var v{} = {};", i, i));
    }
    let reports = project.parse_all();
    assert_eq!(reports.len(), 32);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.file, format!("/src/dojo/m{}.js", i));
        assert_eq!(
            report.module_id.as_ref().unwrap().as_str(),
            format!("dojo/m{}", i)
        );
        let summary = report.outcome.as_ref().unwrap();
        assert_eq!(summary.node_count, 3);
        assert!(summary.output.is_none());
    }
}

#[test]
fn test_failing_unit_is_isolated() {
    let mut project = Project::new(DocscanConfig::default()).with_emit(EmitKind::None);
    project.add_source("a.js", "var a = 1;");
    project.add_source("b.js", "var ;");
    project.add_source("c.js", "var c = 'unterminated");
    project.add_source("d.js", "d();");

    let reports = project.parse_all();
    assert!(reports[0].is_ok());
    assert!(reports[3].is_ok());

    let parse_error = reports[1].outcome.as_ref().unwrap_err();
    assert_eq!(parse_error.code, 1100);
    assert_eq!(parse_error.file.as_deref(), Some("b.js"));

    let lex_error = reports[2].outcome.as_ref().unwrap_err();
    assert_eq!(lex_error.code, 1001);

    let stats = ProjectStats::from_reports(&reports);
    assert_eq!(stats.units, 4);
    assert_eq!(stats.parsed, 2);
    assert_eq!(stats.failed, 2);
}

#[test]
fn test_unmapped_unit_has_no_module_id() {
    let mut project = Project::new(dojo_config());
    project.add_source("/elsewhere/x.js", "x();");
    let reports = project.parse_all();
    assert!(reports[0].module_id.is_none());
    assert!(reports[0].is_ok());
}

#[test]
fn test_warnings_carry_the_file() {
    let mut project = Project::new(DocscanConfig::default()).with_emit(EmitKind::None);
    project.add_source("w.js", "if (a) { b(); }\nx[y];");
    let reports = project.parse_all();
    let summary = reports[0].outcome.as_ref().unwrap();
    let codes: Vec<u32> = summary.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![2002, 2001]);
    assert!(summary
        .warnings
        .iter()
        .all(|w| w.file.as_deref() == Some("w.js")));
    assert_eq!(ProjectStats::from_reports(&reports).warnings, 2);
}

#[test]
fn test_emit_kinds() {
    let source = "function f(a) { return a; }";
    let render = |emit: EmitKind| {
        let mut project = Project::new(DocscanConfig::default()).with_emit(emit);
        project.add_source("f.js", source);
        let mut reports = project.parse_all();
        reports.remove(0).outcome.unwrap().output
    };

    assert_eq!(
        render(EmitKind::Js).unwrap(),
        "function f(a) {\n    return a;\n}\n"
    );
    assert!(render(EmitKind::Symbols).unwrap().starts_with("program\n  var f =FunctionLiteral"));
    assert!(render(EmitKind::Ast).unwrap().contains("VarDecl"));
    assert!(render(EmitKind::None).is_none());
}

#[test]
fn test_add_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.js");
    std::fs::write(&path, "x = 1;").unwrap();

    let mut project = Project::new(DocscanConfig::default());
    project.add_file(&path).unwrap();
    assert_eq!(project.units().len(), 1);
    assert_eq!(project.units()[0].text, "x = 1;");

    let err = project.add_file(&dir.path().join("missing.js")).unwrap_err();
    assert!(matches!(err, ProjectError::Read { .. }));
    assert_eq!(err.to_diagnostic().code, 3001);
    assert_eq!(project.units().len(), 1);
}
