mod common;

use anyhow::Result;
use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_status_lists_configured_modules() -> Result<()> {
    let project = TestProject::new()?;
    project.add_module("Post", "1.2.0", &[])?;
    project.write_published_file("Post", "module.json", r#"{"version": "1.2.0"}"#)?;
    project.add_module("Category", "1.0.0", &[])?;

    project
        .cmd()?
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Post"))
        .stdout(predicate::str::contains("Category"))
        .stdout(predicate::str::contains("published (custom)"));
    Ok(())
}

#[test]
fn test_status_of_unknown_module_fails() -> Result<()> {
    let project = TestProject::new()?;
    project
        .cmd()?
        .args(["status", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn test_track_then_detect_updates() -> Result<()> {
    let project = TestProject::new()?;
    project.add_module("Tag", "1.0.0", &[])?;
    project.add_package_migration("Tag", "a.php")?;

    project
        .cmd()?
        .args(["track", "tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tracked Tag v1.0.0"));
    assert!(project.ctx.layout.ledger_path().exists());

    project.add_package_migration("Tag", "c.php")?;

    project
        .cmd()?
        .args(["detect-updates", "Tag"])
        .assert()
        .success()
        .stdout(predicate::str::contains("c.php"))
        .stdout(predicate::str::contains("vendor:publish --tag=tag-migrations"));
    Ok(())
}

#[test]
fn test_detect_updates_on_untracked_module_fails() -> Result<()> {
    let project = TestProject::new()?;
    project.add_module("Menu", "1.0.0", &[])?;

    project
        .cmd()?
        .args(["detect-updates", "Menu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not yet tracked"));
    Ok(())
}

#[test]
fn test_dependencies_exit_code_follows_result() -> Result<()> {
    let project = TestProject::new()?;
    project.add_module("Post", "1.0.0", &["Category"])?;

    project
        .cmd()?
        .args(["dependencies", "Post"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISSING"))
        .stderr(predicate::str::contains("Missing dependencies for Post: Category"));

    project.add_module("Category", "1.0.0", &[])?;

    project
        .cmd()?
        .args(["dependencies", "Post"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All dependencies are satisfied"));
    Ok(())
}

#[test]
fn test_diff_reports_customisations() -> Result<()> {
    let project = TestProject::new()?;
    project.write_package_file("Post", "x.php", "x")?;
    project.write_package_file("Post", "y.php", "y")?;
    project.write_published_file("Post", "y.php", "y customised")?;
    project.write_published_file("Post", "z.php", "z")?;

    project
        .cmd()?
        .args(["diff", "Post", "--unified"])
        .assert()
        .success()
        .stdout(predicate::str::contains("x.php"))
        .stdout(predicate::str::contains("z.php"))
        .stdout(predicate::str::contains("+y customised"));
    Ok(())
}

#[test]
fn test_diff_of_unpublished_module_only_warns() -> Result<()> {
    let project = TestProject::new()?;
    project.write_package_file("Menu", "module.json", "{}")?;

    project
        .cmd()?
        .args(["diff", "Menu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("has not been published"));
    Ok(())
}

#[test]
fn test_check_migrations_lists_pending() -> Result<()> {
    let project = TestProject::new()?;
    project.add_package_migration("Post", "2024_01_01_create_posts.php")?;
    project.add_package_migration("Post", "2024_02_01_add_slug.php")?;
    project.write_applied(&["2024_01_01_create_posts"])?;

    project
        .cmd()?
        .args(["check-migrations", "Post"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024_02_01_add_slug.php"))
        .stdout(predicate::str::contains("2024_01_01_create_posts.php").not());
    Ok(())
}

#[test]
fn test_enable_and_disable_persist() -> Result<()> {
    let project = TestProject::new()?;
    project.write_statuses(&[("Post", true), ("Menu", false)])?;

    project.cmd()?.args(["disable", "posts"]).assert().success();
    project.cmd()?.args(["enable", "Menu"]).assert().success();

    let statuses = project.ctx.statuses()?;
    assert_eq!(statuses.is_enabled("Post"), Some(false));
    assert_eq!(statuses.is_enabled("Menu"), Some(true));

    project
        .cmd()?
        .args(["enable", "Menu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already enabled"));

    project
        .cmd()?
        .args(["enable", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in status file"));
    Ok(())
}

#[test]
fn test_disable_without_status_file_bootstraps_it() -> Result<()> {
    let project = TestProject::new()?;
    assert!(!project.ctx.layout.status_file.exists());

    project.cmd()?.args(["disable", "Tag"]).assert().success();

    let statuses = project.ctx.statuses()?;
    assert_eq!(statuses.is_enabled("Tag"), Some(false));
    assert_eq!(statuses.is_enabled("Post"), Some(true));
    assert_eq!(statuses.is_enabled("Menu"), Some(true));
    Ok(())
}

#[test]
fn test_versions_changelog() -> Result<()> {
    let project = TestProject::new()?;
    project.add_module("Menu", "2.0.0", &[])?;
    project.write_package_file("Menu", "CHANGELOG.md", "# 2.0.0\n- nested menus\n")?;

    project
        .cmd()?
        .args(["versions", "--changelog", "menus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nested menus"));

    project
        .cmd()?
        .args(["versions", "--changelog", "Tag"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_config_set_and_get() -> Result<()> {
    let project = TestProject::new()?;

    project
        .cmd()?
        .args(["config", "diff.preview_lines", "8"])
        .assert()
        .success();

    project
        .cmd()?
        .args(["config", "diff.preview_lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8"));

    project
        .cmd()?
        .args(["config", "diff.preview_lines", "0"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_completion_needs_no_project() -> Result<()> {
    let temp = tempfile::tempdir()?;
    assert_cmd::Command::cargo_bin("modman")?
        .env(modman::PROJECT_ROOT_ENV, temp.path().join("missing"))
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modman"));
    Ok(())
}
