mod common;

use common::{file_name_signer, md5_of, provision_sidecar, write};
use std::fs;
use tempfile::TempDir;
use tocsig_core::ErrorKind;

#[test]
fn test_manifest_without_references_is_plain_digest() {
    let dir = TempDir::new().unwrap();
    let toc = write(dir.path(), "a.toc", b"## Title: Empty\n# nothing here\n");

    let (digest, report) = file_name_signer().compute(&toc).unwrap();

    assert_eq!(
        digest.as_bytes(),
        &md5_of(&[b"## Title: Empty\n# nothing here\n"])
    );
    assert_eq!(report.visited, vec![toc]);
}

#[test]
fn test_references_accumulate_in_line_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A.lua", b"alpha");
    write(dir.path(), "B.lua", b"beta");
    let forward = write(dir.path(), "forward.toc", b"A.lua\nB.lua\n");
    let reverse = write(dir.path(), "reverse.toc", b"B.lua\nA.lua\n");

    let signer = file_name_signer();
    let (fwd, _) = signer.compute(&forward).unwrap();
    let (rev, _) = signer.compute(&reverse).unwrap();

    assert_eq!(fwd.as_bytes(), &md5_of(&[b"A.lua\nB.lua\n", b"alpha", b"beta"]));
    assert_eq!(rev.as_bytes(), &md5_of(&[b"B.lua\nA.lua\n", b"beta", b"alpha"]));
    assert_ne!(fwd, rev);
}

#[test]
fn test_missing_reference_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "present.lua", b"here");
    let toc = write(dir.path(), "a.toc", b"absent.lua\npresent.lua\n");

    let (digest, report) = file_name_signer().compute(&toc).unwrap();

    assert_eq!(
        digest.as_bytes(),
        &md5_of(&[b"absent.lua\npresent.lua\n", b"here"])
    );
    assert_eq!(report.missing, vec![dir.path().join("absent.lua")]);
    assert_eq!(report.visited.len(), 2);
}

#[test]
fn test_scenario_toc_lua_xml_lua_order() {
    let dir = TempDir::new().unwrap();
    let toc = write(dir.path(), "a.toc", b"b.lua\n# comment\nc.xml\n");
    write(dir.path(), "b.lua", b"-- b");
    let xml = br#"<Ui><Script file="d.lua"/></Ui>"#;
    write(dir.path(), "c.xml", xml);
    write(dir.path(), "d.lua", b"-- d");

    let (digest, report) = file_name_signer().compute(&toc).unwrap();

    assert_eq!(
        report.visited,
        vec![
            toc,
            dir.path().join("b.lua"),
            dir.path().join("c.xml"),
            dir.path().join("d.lua"),
        ]
    );
    assert_eq!(
        digest.as_bytes(),
        &md5_of(&[b"b.lua\n# comment\nc.xml\n", b"-- b", xml, b"-- d"])
    );
}

#[test]
fn test_nested_markup_resolves_relative_to_itself() {
    let dir = TempDir::new().unwrap();
    let toc = write(dir.path(), "Pack/Pack.toc", b"Frames\\Main.xml\n");
    write(
        dir.path(),
        "Pack/Frames/Main.xml",
        br#"<Ui><Include file="Sub/Widgets.xml"/></Ui>"#,
    );
    write(
        dir.path(),
        "Pack/Frames/Sub/Widgets.xml",
        br#"<Ui><Frame><Scripts><Script file="Widgets.lua"/></Scripts></Frame></Ui>"#,
    );
    write(dir.path(), "Pack/Frames/Sub/Widgets.lua", b"widgets");

    let (_, report) = file_name_signer().compute(&toc).unwrap();

    let pack = dir.path().join("Pack");
    assert_eq!(
        report.visited,
        vec![
            toc,
            pack.join("Frames").join("Main.xml"),
            pack.join("Frames").join("Sub").join("Widgets.xml"),
            pack.join("Frames").join("Sub").join("Widgets.lua"),
        ]
    );
    assert!(report.missing.is_empty());
}

#[test]
fn test_companion_file_appended_last() {
    let dir = TempDir::new().unwrap();
    let toc = write(dir.path(), "a.toc", b"b.lua\n");
    write(dir.path(), "b.lua", b"bee");
    let bindings = br#"<Bindings><Binding name="X"><Script file="never.lua"/></Binding></Bindings>"#;
    write(dir.path(), "Bindings.xml", bindings);

    let (digest, report) = file_name_signer().compute(&toc).unwrap();

    assert_eq!(digest.as_bytes(), &md5_of(&[b"b.lua\n", b"bee", bindings]));
    assert_eq!(report.visited.last(), Some(&dir.path().join("Bindings.xml")));
    assert!(report.missing.is_empty(), "companion must not be expanded");
}

#[test]
fn test_malformed_markup_aborts_whole_root() {
    let dir = TempDir::new().unwrap();
    let toc = write(dir.path(), "a.toc", b"ok.lua\nbroken.xml\n");
    write(dir.path(), "ok.lua", b"ok");
    write(dir.path(), "broken.xml", b"<Ui><Script file=\"x.lua\"></Ui>");
    let sidecar = provision_sidecar(&toc, b"tail");

    let err = file_name_signer().process(&toc).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert_eq!(fs::read(&sidecar).unwrap()[..16], [0u8; 16]);
}

#[test]
fn test_latin1_markup_is_signed_with_raw_bytes() {
    let dir = TempDir::new().unwrap();
    let xml: &[u8] =
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<Ui><!-- caf\xe9 --><Script file=\"x.lua\"/></Ui>";
    let toc = write(dir.path(), "A.toc", b"f.xml\n");
    write(dir.path(), "f.xml", xml);
    write(dir.path(), "x.lua", b"x");
    let sidecar = provision_sidecar(&toc, b"");

    let outcome = file_name_signer().process(&toc).unwrap();

    let expected = md5_of(&[b"f.xml\n", xml, b"x"]);
    assert_eq!(outcome.digest.as_bytes(), &expected);
    assert_eq!(&fs::read(&sidecar).unwrap()[..16], &expected);
}

#[test]
fn test_non_utf8_manifest_line_aborts() {
    let dir = TempDir::new().unwrap();
    let toc = write(dir.path(), "a.toc", b"\xc3\x28.lua\n");

    let err = file_name_signer().compute(&toc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_reference_to_directory_is_hard_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("Libs")).unwrap();
    let toc = write(dir.path(), "a.toc", b"Libs\n");

    let err = file_name_signer().compute(&toc).unwrap_err();
    assert!(!err.kind().is_soft());
}

#[cfg(unix)]
#[test]
fn test_permission_denied_is_hard_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = write(dir.path(), "locked.lua", b"secret");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let toc = write(dir.path(), "a.toc", b"locked.lua\n");

    // Privileged users can read the file anyway.
    if fs::read(&locked).is_ok() {
        return;
    }

    let err = file_name_signer().compute(&toc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}
