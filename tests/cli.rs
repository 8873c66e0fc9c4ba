mod common;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

use common::{StubServer, closed_base_url};

fn station(base_url: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("scanpost");
    cmd.env_remove("SCANPOST_TIMEOUT_MS")
        .env_remove("SCANPOST_TIMEZONE")
        .env("RUST_LOG", "off")
        .args(["--base-url", base_url, "--timeout-ms", "5000"]);
    cmd
}

#[test]
fn scan_is_registered_once_until_scan_again() {
    let server = StubServer::start(vec![(200, r#"{"id": 1}"#), (200, r#"{"id": 2}"#)]);

    station(&server.base_url)
        .write_stdin(
            "abrir\n\
             scan 32 4006381333931\n\
             scan 32 4006381333931\n\
             novamente\n\
             {\"type\": \"org.iso.PDF417\", \"data\": \"XYZ\"}\n\
             sair\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Código lido: 4006381333931 (EAN-13)"))
        .stdout(predicate::str::contains("Código lido: XYZ (PDF417)"))
        .stdout(predicate::str::contains("cadastrado com sucesso").count(2));

    let first = server.requests.recv().unwrap();
    let second = server.requests.recv().unwrap();
    assert_eq!(first.body["codigo"], "4006381333931");
    assert_eq!(second.body["tipo"], "PDF417");
    server.join();
}

#[test]
fn transport_failure_is_reported_and_station_keeps_running() {
    station(&closed_base_url())
        .write_stdin("open\nscan ean13 123\nagain\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("falha de comunicação"))
        .stdout(predicate::str::contains("[fechar] Fechar Câmera"));
}

#[test]
fn denied_permission_blocks_camera() {
    station(&closed_base_url())
        .args(["--camera-permission", "denied"])
        .write_stdin("abrir\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sem permissão para acessar a Câmera"))
        .stdout(predicate::str::contains("! camera permission was denied"));
}

#[test]
fn bad_lines_do_not_stop_the_station() {
    station(&closed_base_url())
        .write_stdin("dance\nscan 32\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("! unknown command: dance"))
        .stdout(predicate::str::contains("! usage: scan <type> <data>"));
}

#[test]
fn rejects_invalid_base_url() {
    station("ftp://example.com")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}
