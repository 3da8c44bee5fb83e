//! End-to-end runs over a course tree on disk: import a module, renumber the
//! tree, then import again and check that lessons survived the renames.

use std::fs;
use std::num::NonZeroU32;
use std::path::Path;
use syllabus::apply::{self, Mode};
use syllabus::assemble::Assembler;
use syllabus::config::{self, SyllabusConfig};
use syllabus::display::ImportScanner;
use syllabus::group::GroupMode;
use syllabus::renumber::{self, PlanOptions};
use syllabus::types::{Course, ModuleItem};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn course(root: &Path) {
    write(root, "3_basics/README.md", "# Basics");
    write(root, "3_basics/1_intro.md", "");
    write(root, "3_basics/1_intro.py", "import turtle\n");
    write(root, "3_basics/4_loops.md", "");
    write(root, "3_basics/9_loops.md", "");
    write(root, "3_basics/9_loops.py", "print('hi')\n");
    write(root, "3_basics/images/1_pic.png", "");
    write(root, "7_functions/2_def.md", "");
    write(root, "drafts/5_idea.md", "");
}

fn lesson_names(items: &[ModuleItem]) -> Vec<String> {
    items.iter().map(|i| i.name().to_string()).collect()
}

#[test]
fn renumber_then_reimport_keeps_lessons() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    course(root);

    let config = SyllabusConfig::default();
    let probe = ImportScanner::from_config(&config.display);
    let assembler = Assembler::new(&config, &probe);

    let before = assembler
        .read_module(&root.join("3_basics"), GroupMode::Grouped)
        .unwrap();
    assert_eq!(lesson_names(&before.lessons), vec!["intro", "loops"]);

    let plan = renumber::plan_renumber(root, &PlanOptions::from_config(&config)).unwrap();
    let report = apply::apply(plan, Mode::Apply).unwrap();
    assert!(report.is_complete());

    assert!(root.join("01_basics/01_intro.md").exists());
    assert!(root.join("01_basics/02_intro.py").exists());
    assert!(root.join("01_basics/03_loops.md").exists());
    assert!(root.join("01_basics/04_loops.md").exists());
    assert!(root.join("01_basics/05_loops.py").exists());
    assert!(root.join("02_functions/01_def.md").exists());
    // unranked and excluded subtrees are untouched
    assert!(root.join("drafts/5_idea.md").exists());
    assert!(root.join("01_basics/images/1_pic.png").exists());

    let after = assembler
        .read_module(&root.join("01_basics"), GroupMode::Grouped)
        .unwrap();
    assert_eq!(lesson_names(&after.lessons), lesson_names(&before.lessons));
    assert_eq!(after.overview, Some(root.join("01_basics/README.md")));

    let ModuleItem::Lesson(intro) = &after.lessons[0] else {
        panic!("intro should be a single lesson");
    };
    assert!(intro.display);
    assert_eq!(intro.exercise, Some(root.join("01_basics/02_intro.py")));

    let ModuleItem::Group(loops) = &after.lessons[1] else {
        panic!("loops should be a group");
    };
    // the exercise joins the first content lesson still missing one
    assert_eq!(loops.lessons.len(), 2);
    assert_eq!(loops.lessons[0].lesson, Some(root.join("01_basics/03_loops.md")));
    assert_eq!(loops.lessons[0].exercise, Some(root.join("01_basics/05_loops.py")));
    assert_eq!(loops.lessons[1].lesson, Some(root.join("01_basics/04_loops.md")));
    assert_eq!(loops.lessons[1].exercise, None);
    assert!(!loops.lessons[0].display);

    let again = renumber::plan_renumber(root, &PlanOptions::from_config(&config)).unwrap();
    assert!(again.is_empty(), "left over: {:?}", again.operations);
}

#[test]
fn dry_run_matches_later_apply() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    course(root);

    let options = PlanOptions::default().with_increment(NonZeroU32::new(10).unwrap());
    let preview = apply::apply(renumber::plan_renumber(root, &options).unwrap(), Mode::DryRun).unwrap();
    assert!(root.join("3_basics/1_intro.md").exists());

    let applied = apply::apply(renumber::plan_renumber(root, &options).unwrap(), Mode::Apply).unwrap();
    let pairs = |r: &apply::TransactionReport| {
        r.outcomes
            .iter()
            .map(|o| (o.operation.old_path.clone(), o.operation.new_path.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(pairs(&preview), pairs(&applied));
    assert_eq!(applied.renamed(), preview.outcomes.len());
    assert!(root.join("10_basics/10_intro.md").exists());
    assert!(root.join("20_functions/10_def.md").exists());
}

#[test]
fn config_file_drives_increment_and_artifacts() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        config::CONFIG_FILE,
        "[renumber]\nincrement = 5\n\n[artifacts]\nassessment = [\"quiz\"]\n",
    );
    write(root, "course/1_a.md", "");
    write(root, "course/1_a.quiz", "");

    let config = config::load_config(root).unwrap();
    assert_eq!(config.renumber.increment.get(), 5);

    let probe = ImportScanner::from_config(&config.display);
    let module = Assembler::new(&config, &probe)
        .read_module(&root.join("course"), GroupMode::Grouped)
        .unwrap();
    let ModuleItem::Lesson(a) = &module.lessons[0] else {
        panic!("expected a lesson");
    };
    assert_eq!(a.assessment, Some(root.join("course/1_a.quiz")));
    assert_eq!(a.lesson, Some(root.join("course/1_a.md")));

    let plan = renumber::plan_renumber(&root.join("course"), &PlanOptions::from_config(&config)).unwrap();
    let targets: Vec<_> = plan.operations.iter().map(|op| op.new_path.clone()).collect();
    assert_eq!(
        targets,
        vec![root.join("course/05_a.md"), root.join("course/10_a.quiz")]
    );
}

#[test]
fn recursive_import_serializes_as_course() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    course(root);

    let config = SyllabusConfig::default();
    let probe = ImportScanner::from_config(&config.display);
    let modules = Assembler::new(&config, &probe)
        .read_modules(root, GroupMode::Grouped)
        .unwrap();
    let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["3_basics", "7_functions", "drafts"]);

    let mut course = Course::new("python");
    modules.into_iter().for_each(|m| course.append(m));
    let json: serde_json::Value = serde_json::to_value(&course).unwrap();
    assert_eq!(json["name"], "python");
    assert_eq!(json["modules"][0]["lessons"][0]["name"], "intro");
    assert_eq!(json["modules"][0]["lessons"][0]["display"], true);
}
