//! End-to-end rendering of the built-in variants with the real engine.

use qtscaffold_adapters::{BuiltinCatalog, MemoryFilesystem, MiniJinjaEngine};
use qtscaffold_core::prelude::*;

fn service() -> ScaffoldService {
    ScaffoldService::new(
        Box::new(BuiltinCatalog::new()),
        Box::new(MiniJinjaEngine::new()),
        Box::new(MemoryFilesystem::new()),
    )
}

fn widget_config() -> ConfigurationBuilder {
    Configuration::builder()
        .set("name", "notes")
        .set("className", "MainWindow")
        .set("baseClass", "QMainWindow")
}

fn content<'a>(project: &'a RenderedProject, path: &str) -> &'a str {
    &project
        .file(path)
        .unwrap_or_else(|| panic!("{path} was not rendered"))
        .content
}

// ============================================================================
// Catalog consistency
// ============================================================================

#[test]
fn builtin_variants_pass_consistency_checks() {
    let service = service();
    for info in service.list_variants().unwrap() {
        service.describe(&info.id).unwrap();
    }
}

#[test]
fn unknown_variant_is_not_found() {
    let err = service()
        .render("qml", &Configuration::builder().set("name", "x").build())
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(err.suggestions().iter().any(|s| s.contains("qtquick")));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn identical_inputs_render_identically() {
    let config = widget_config()
        .set("useTranslation", true)
        .set("languages", vec!["de_DE", "fr_FR"])
        .set("useForm", true)
        .set("uiHeaderFile", "ui_mainwindow.h")
        .build();

    let service = service();
    let first = service.render("qwidget", &config).unwrap();
    let second = service.render("qwidget", &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn files_come_out_in_catalog_order() {
    let config = widget_config()
        .set("useTranslation", true)
        .set("languages", vec!["de_DE"])
        .build();
    let project = service().render("qwidget", &config).unwrap();
    let paths: Vec<String> = project.files().iter().map(|f| f.path.to_string()).collect();
    assert_eq!(
        paths,
        vec!["main.cpp", "mainwindow.h", "mainwindow.cpp", "translations.qrc"]
    );
}

// ============================================================================
// Guard style
// ============================================================================

#[test]
fn pragma_once_header_has_no_include_guard() {
    let project = service().render("qwidget", &widget_config().build()).unwrap();
    let header = content(&project, "mainwindow.h");

    assert!(header.starts_with("#pragma once\n"));
    assert!(!header.contains("#ifndef"));
    assert!(!header.contains("#define"));
    assert!(!header.contains("#endif"));
}

#[test]
fn guarded_header_opens_and_closes_once() {
    let config = widget_config()
        .set("usePragmaOnce", false)
        .set("includeGuardToken", "MAINWINDOW_H")
        .build();
    let project = service().render("qwidget", &config).unwrap();
    let header = content(&project, "mainwindow.h");

    assert_eq!(header.matches("#ifndef MAINWINDOW_H").count(), 1);
    assert_eq!(header.matches("#define MAINWINDOW_H").count(), 1);
    assert_eq!(header.matches("#endif // MAINWINDOW_H").count(), 1);
    assert!(!header.contains("#pragma once"));
    assert!(header.trim_end().ends_with("#endif // MAINWINDOW_H"));
}

#[test]
fn guard_token_appears_on_all_three_guard_lines() {
    let config = Configuration::builder()
        .set("name", "notes")
        .set("usePragmaOnce", false)
        .set("includeGuardToken", "WIDGET_H")
        .build();
    let project = service().render("qwidget", &config).unwrap();
    let header = content(&project, "widget.h");

    assert_eq!(header.matches("WIDGET_H").count(), 3);
    assert_eq!(header.lines().last(), Some("#endif // WIDGET_H"));
}

#[test]
fn guard_token_without_guard_mode_is_rejected() {
    let config = widget_config().set("includeGuardToken", "MAINWINDOW_H").build();
    let err = service().render("qwidget", &config).unwrap_err();
    assert!(matches!(
        err,
        ScaffoldError::Config(ConfigError::UnexpectedOption { ref option, .. })
            if option == "includeGuardToken"
    ));
}

// ============================================================================
// Form usage
// ============================================================================

fn form(usage: &str) -> RenderedProject {
    let mut config = widget_config().set("useForm", true).set("uiUsage", usage);
    if usage != "inherit" {
        config = config.set("uiHeaderFile", "ui_mainwindow.h");
    }
    service().render("qwidget", &config.build()).unwrap()
}

#[test]
fn pointer_form_is_forward_declared_and_owned() {
    let project = form("pointer");
    let header = content(&project, "mainwindow.h");
    let source = content(&project, "mainwindow.cpp");

    assert!(header.contains("namespace Ui { class MainWindow; }"));
    assert!(header.contains("Ui::MainWindow *ui;"));
    assert!(!header.contains("private Ui::MainWindow"));
    assert!(!header.contains("#include \"ui_mainwindow.h\""));
    assert!(source.contains("#include \"ui_mainwindow.h\""));
    assert!(source.contains(", ui(new Ui::MainWindow)"));
    assert!(source.contains("ui->setupUi(this);"));
    assert!(source.contains("delete ui;"));
}

#[test]
fn member_form_is_held_by_value() {
    let project = form("member");
    let header = content(&project, "mainwindow.h");
    let source = content(&project, "mainwindow.cpp");

    assert!(header.contains("#include \"ui_mainwindow.h\""));
    assert!(header.contains("Ui::MainWindow ui;"));
    assert!(!header.contains("namespace Ui"));
    assert!(!header.contains("*ui;"));
    assert!(source.contains("ui.setupUi(this);"));
    assert!(!source.contains("delete ui;"));
    assert!(!source.contains("new Ui::"));
}

#[test]
fn inherited_form_is_a_private_base() {
    let project = form("inherit");
    let header = content(&project, "mainwindow.h");
    let source = content(&project, "mainwindow.cpp");

    assert!(header.contains("class MainWindow : public QMainWindow, private Ui::MainWindow"));
    assert!(header.contains("#include \"ui_mainwindow.h\""));
    assert!(!header.contains("namespace Ui"));
    assert!(!header.contains("Ui::MainWindow ui;"));
    assert!(!header.contains("*ui;"));
    assert!(source.contains("    setupUi(this);"));
    assert!(!source.contains("ui.setupUi"));
    assert!(!source.contains("ui->setupUi"));
}

#[test]
fn no_form_means_no_ui_code() {
    let project = service().render("qwidget", &widget_config().build()).unwrap();
    for file in project.files() {
        assert!(!file.content.contains("Ui::"), "{}", file.path);
        assert!(!file.content.contains("setupUi"), "{}", file.path);
    }
}

#[test]
fn pointer_form_without_header_fails_before_rendering() {
    let filesystem = MemoryFilesystem::new();
    let service = ScaffoldService::new(
        Box::new(BuiltinCatalog::new()),
        Box::new(MiniJinjaEngine::new()),
        Box::new(filesystem.clone()),
    );
    let config = widget_config()
        .set("useForm", true)
        .set("uiUsage", "pointer")
        .build();

    let err = service
        .scaffold("qwidget", &config, "notes", &EmitOptions::default())
        .unwrap_err();

    assert!(err.is_validation_failure());
    assert!(matches!(
        err,
        ScaffoldError::Config(ConfigError::MissingOption { ref option, .. })
            if option == "uiHeaderFile"
    ));
    assert!(filesystem.is_empty());
}

// ============================================================================
// Names and translations
// ============================================================================

#[test]
fn class_name_is_reused_verbatim() {
    let project = service().render("qwidget", &widget_config().build()).unwrap();
    assert!(content(&project, "main.cpp").contains("#include \"mainwindow.h\""));
    assert!(content(&project, "main.cpp").contains("MainWindow w;"));
    assert!(content(&project, "mainwindow.h").contains("class MainWindow : public QMainWindow"));
    assert!(content(&project, "mainwindow.cpp").contains("MainWindow::MainWindow(QWidget *parent)"));
    assert!(content(&project, "mainwindow.cpp").contains(": QMainWindow(parent)"));
}

#[test]
fn keyword_names_are_rejected_before_rendering() {
    let config = widget_config().set("className", "class").build();
    let err = service().render("qwidget", &config).unwrap_err();
    assert!(matches!(
        err,
        ScaffoldError::Config(ConfigError::InvalidIdentifier { ref value, .. }) if value == "class"
    ));

    let config = Configuration::builder().set("name", "int").build();
    let err = service().render("qtquick", &config).unwrap_err();
    assert!(matches!(
        err,
        ScaffoldError::Config(ConfigError::InvalidIdentifier { ref option, .. }) if option == "name"
    ));
}

#[test]
fn class_name_clashing_with_main_is_config_error() {
    let config = widget_config().set("className", "Main").build();
    let err = service().render("qwidget", &config).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(matches!(
        err,
        ScaffoldError::Config(ConfigError::ConflictingPath { ref option, ref path, .. })
            if option == "className" && path == "main.cpp"
    ));
}

#[test]
fn translations_are_rendered_only_when_enabled() {
    let plain = service().render("qwidget", &widget_config().build()).unwrap();
    assert!(plain.file("translations.qrc").is_none());
    assert!(!content(&plain, "main.cpp").contains("QTranslator"));

    let config = widget_config()
        .set("useTranslation", true)
        .set("languages", vec!["de_DE", "fr_FR"])
        .build();
    let translated = service().render("qwidget", &config).unwrap();
    let qrc = content(&translated, "translations.qrc");
    assert!(qrc.contains("<file>notes_de_DE.qm</file>"));
    assert!(qrc.contains("<file>notes_fr_FR.qm</file>"));
    assert!(content(&translated, "main.cpp").contains("\"notes_\" + QLocale(locale).name()"));
}

#[test]
fn languages_require_translation() {
    let config = widget_config().set("languages", vec!["de_DE"]).build();
    assert!(service().render("qwidget", &config).is_err());
}

// ============================================================================
// Qt Quick version gates
// ============================================================================

fn quick(version: &str) -> String {
    let config = Configuration::builder()
        .set("name", "gallery")
        .set("minimumQtVersion", version)
        .build();
    let project = service().render("qtquick", &config).unwrap();
    content(&project, "main.cpp").to_string()
}

#[test]
fn qt_6_4_loads_by_url_with_failure_signal() {
    let main = quick("6.4");
    assert!(main.contains("QStringLiteral(\"qrc:/gallery/Main.qml\")"));
    assert!(main.contains("engine.load(url);"));
    assert!(main.contains("objectCreationFailed"));
    assert!(!main.contains("loadFromModule"));
    assert!(!main.contains("&QQmlApplicationEngine::objectCreated,"));
}

#[test]
fn qt_6_3_checks_object_creation() {
    let main = quick("6.3");
    assert!(main.contains("&QQmlApplicationEngine::objectCreated,"));
    assert!(!main.contains("objectCreationFailed"));
    assert!(main.contains("engine.load(url);"));
}

#[test]
fn qt_6_5_and_later_load_from_module() {
    for version in ["6.5", "6.6", "6.10", "6.49", "7"] {
        let main = quick(version);
        assert!(main.contains("engine.loadFromModule(\"gallery\", \"Main\");"), "{version}");
        assert!(!main.contains("engine.load(url);"), "{version}");
        assert!(!main.contains("QStringLiteral"), "{version}");
        assert!(main.contains("objectCreationFailed"), "{version}");
    }
}

#[test]
fn malformed_version_is_rejected() {
    let config = Configuration::builder()
        .set("name", "gallery")
        .set("minimumQtVersion", "6.x")
        .build();
    let err = service().render("qtquick", &config).unwrap_err();
    assert!(matches!(err, ScaffoldError::VersionParse(_)));
}

#[test]
fn virtual_keyboard_touches_both_files() {
    let config = Configuration::builder()
        .set("name", "kiosk")
        .set("useVirtualKeyboard", true)
        .build();
    let project = service().render("qtquick", &config).unwrap();
    assert!(content(&project, "main.cpp").contains("qtvirtualkeyboard"));
    assert!(content(&project, "Main.qml").contains("import QtQuick.VirtualKeyboard"));
    assert!(content(&project, "Main.qml").contains("InputPanel {"));

    let plain = service()
        .render("qtquick", &Configuration::builder().set("name", "kiosk").build())
        .unwrap();
    assert!(!content(&plain, "Main.qml").contains("InputPanel"));
    assert!(!content(&plain, "main.cpp").contains("qputenv"));
}
