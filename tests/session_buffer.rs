use std::fs;

use refl::session::{module_name_from_filename, SessionBuffer};

#[test]
fn test_scratch_file_is_an_agda_module() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = SessionBuffer::create_in(dir.path()).unwrap();

    let name = buffer.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with(".agda"));
    assert_eq!(
        buffer.header(),
        format!("module {} where", module_name_from_filename(&name))
    );
    assert_eq!(buffer.path().parent(), Some(dir.path()));
}

#[test]
fn test_append_then_reset() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = SessionBuffer::create_in(dir.path()).unwrap();

    buffer.append("id : {A : Set} → A → A").unwrap();
    buffer.append("id x = x").unwrap();
    assert_eq!(
        buffer.contents(),
        format!("{}\n\nid : {{A : Set}} → A → A\n\nid x = x\n\n", buffer.header())
    );
    assert_eq!(fs::read_to_string(buffer.path()).unwrap(), buffer.contents());

    buffer.reset().unwrap();
    assert_eq!(buffer.body(), "");
    assert_eq!(
        fs::read_to_string(buffer.path()).unwrap(),
        format!("{}\n\n", buffer.header())
    );
}

#[test]
fn test_prelude_import_uses_module_name() {
    let dir = tempfile::tempdir().unwrap();
    let lib = tempfile::tempdir().unwrap();
    let prelude = lib.path().join("Base.lagda.md");
    let mut buffer = SessionBuffer::create_in(dir.path()).unwrap();

    let include = buffer.with_prelude(&prelude).unwrap();
    assert_eq!(include, lib.path());
    assert_eq!(buffer.body(), "import Base\n\n");
}

#[test]
fn test_two_buffers_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let a = SessionBuffer::create_in(dir.path()).unwrap();
    let b = SessionBuffer::create_in(dir.path()).unwrap();
    assert_ne!(a.path(), b.path());
}

#[test]
fn test_drop_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = SessionBuffer::create_in(dir.path()).unwrap();
    let path = buffer.path().to_path_buf();
    drop(buffer);
    assert!(!path.exists());
}
