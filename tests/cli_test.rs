use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::Command; // Run programs

type DYNERR = Box<dyn std::error::Error>;

#[test]
fn dump_piped_nibbles() -> Result<(),DYNERR> {
    let trk = hex::decode("FFFFFFD5AA96FFFEAABBAFAFFAEADEAAEBFFFF")?;
    assert_cmd::Command::cargo_bin("a2nib")?
        .arg("dump")
        .arg("-s").arg("16")
        .write_stdin(trk)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0000 : FF FF FF D5 AA 96 FF FE AA BB AF AF FA EA DE AA |>>>(A:fe110fe0:A|\n"))
        .stdout(predicate::str::contains("0010 : EB FF FF "))
        .stdout(predicate::str::contains("Encountered").not());
    Ok(())
}

#[test]
fn dump_file_with_errors() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("trk.bin");
    std::fs::write(&path,hex::decode("9697AB")?)?;
    Command::cargo_bin("a2nib")?
        .arg("dump")
        .arg("-s").arg("13")
        .arg("-f").arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("|??.             |"))
        .stdout(predicate::str::ends_with("\nEncountered 2 invalid bytes\n"));
    Ok(())
}

#[test]
fn dump_unknown_standard() -> Result<(),DYNERR> {
    Command::cargo_bin("a2nib")?
        .arg("dump")
        .arg("-s").arg("12")
        .assert()
        .failure()
        .stderr(predicate::str::contains("12"));
    Ok(())
}

#[test]
fn completions_script() -> Result<(),DYNERR> {
    Command::cargo_bin("a2nib")?
        .arg("completions")
        .arg("-s").arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("a2nib"));
    Ok(())
}

#[test]
fn no_subcommand() -> Result<(),DYNERR> {
    Command::cargo_bin("a2nib")?
        .assert()
        .failure();
    Ok(())
}

/// Tests that substitute a shell script for the backend
#[cfg(unix)]
mod fake_backend {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path,PathBuf};
    use std::sync::Mutex;

    const META_35: &str = r#"{"woz2":{"info":{"disk_type":{"_raw":"02"}}}}"#;
    const META_DO: &str = r#"{"do":{}}"#;

    // writing an executable while another thread spawns can make the exec fail with ETXTBSY
    static SERIAL: Mutex<()> = Mutex::new(());

    /// Create the fake a2kit and a dummy disk image in `dir`
    fn setup(dir: &Path,meta: &str) -> Result<(PathBuf,PathBuf),DYNERR> {
        let script = format!(r#"#!/bin/sh
if [ "$1" = "-V" ]; then echo "a2kit 4.1.0"; exit 0; fi
cat > /dev/null
case "$1 $3" in
  "get meta") echo '{}' ;;
  "get track") printf '\377\377\325\252\226\226\227\232\336\252' ;;
  "get sec") case "$5" in
    *,,*) printf '%s' "$5" ;;
    *) printf 'HELLO' ;;
  esac ;;
  "get block") printf 'BLOCK' ;;
  stat*) echo '{{"fs":"dos33","files":3}}' ;;
  geometry*) echo '{{"tracks":[{{"cylinder":0,"head":0}}]}}' ;;
  *) echo "unexpected request" >&2; exit 1 ;;
esac
"#,meta);
        let exe = dir.join("a2kit");
        std::fs::write(&exe,script)?;
        std::fs::set_permissions(&exe,std::fs::Permissions::from_mode(0o755))?;
        let img = dir.join("disk.woz");
        std::fs::write(&img,vec![0;1024])?;
        Ok((exe,img))
    }

    fn a2nib(subcommand: &str,exe: &Path,img: &Path) -> Result<Command,DYNERR> {
        let mut cmd = Command::cargo_bin("a2nib")?;
        cmd.arg(subcommand).arg("--backend").arg(exe).arg("-d").arg(img);
        Ok(cmd)
    }

    #[test]
    fn track_listing() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("track",&exe,&img)?
            .arg("-f").arg("0,0")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("0000 : FF FF D5 AA 96 96 97 9A DE AA "))
            .stdout(predicate::str::contains("|>>(A:012^?"));
        Ok(())
    }

    #[test]
    fn track_not_supported() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_DO)?;
        a2nib("track",&exe,&img)?
            .arg("-f").arg("0,0")
            .assert()
            .failure()
            .stderr(predicate::str::contains("NibblesNotSupported"));
        Ok(())
    }

    #[test]
    fn descriptor_and_availability() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("nibdesc",&exe,&img)?
            .assert()
            .success()
            .stdout(predicate::str::starts_with("3.5 inch: "));
        a2nib("has-nibbles",&exe,&img)?
            .assert()
            .success()
            .stdout("true\n");
        let (exe,img) = setup(dir.path(),META_DO)?;
        a2nib("nibdesc",&exe,&img)?
            .assert()
            .success()
            .stdout("none\n");
        Ok(())
    }

    #[test]
    fn metadata() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("meta",&exe,&img)?
            .assert()
            .success()
            .stdout(predicate::str::starts_with("{\n    \"woz2\": {\n        \"info\": {"));
        a2nib("meta",&exe,&img)?
            .arg("--indent").arg("2")
            .assert()
            .success()
            .stdout(predicate::str::contains("\n  \"woz2\": {"));
        Ok(())
    }

    #[test]
    fn geometry_and_stat() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("geometry",&exe,&img)?
            .assert()
            .success()
            .stdout(predicate::str::contains("\n    \"tracks\": ["))
            .stdout(predicate::str::contains("\"cylinder\": 0"));
        a2nib("stat",&exe,&img)?
            .arg("--indent").arg("2")
            .assert()
            .success()
            .stdout(predicate::str::contains("\n  \"fs\": \"dos33\""))
            .stdout(predicate::str::contains("\n  \"files\": 3"));
        Ok(())
    }

    #[test]
    fn sector_list() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("sec",&exe,&img)?
            .arg("-f").arg("17,0,1,2,3")
            .assert()
            .success()
            .stdout("17,0,1,,17,0,2,,17,0,3");
        Ok(())
    }

    #[test]
    fn missing_backend_is_not_replaced() -> Result<(),DYNERR> {
        let dir = tempfile::tempdir()?;
        let img = dir.path().join("disk.woz");
        std::fs::write(&img,vec![0;1024])?;
        a2nib("meta",&dir.path().join("no-such-a2kit"),&img)?
            .env("A2KIT_PATH","/bin/sh")
            .assert()
            .failure()
            .stderr(predicate::str::contains("NotFound"));
        Ok(())
    }

    #[test]
    fn sector_and_block() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("sec",&exe,&img)?
            .arg("-f").arg("0,0,15")
            .assert()
            .success()
            .stdout("HELLO");
        a2nib("sec",&exe,&img)?
            .arg("-f").arg("0,0,15")
            .arg("--console")
            .assert()
            .success()
            .stdout(predicate::str::contains("0000 : 48 45 4C 4C 4F "))
            .stdout(predicate::str::contains("|+| HELLO "));
        a2nib("block",&exe,&img)?
            .arg("-f").arg("2")
            .assert()
            .success()
            .stdout("BLOCK");
        Ok(())
    }

    #[test]
    fn bad_sector_request() -> Result<(),DYNERR> {
        let _lock = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir()?;
        let (exe,img) = setup(dir.path(),META_35)?;
        a2nib("sec",&exe,&img)?
            .arg("-f").arg("0,0")
            .assert()
            .failure()
            .stderr(predicate::str::contains("cylinder,head,sector"));
        Ok(())
    }
}
