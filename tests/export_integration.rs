//! End-to-end export tests
//!
//! Spreadsheet files on disk go through the session, the assembler and the
//! HTML export, the same path the `hddviz` binary takes.

use std::path::{Path, PathBuf};

use hddviz::config::VizConfig;
use hddviz::export::{export_html, placeholders_in, render_html, resolve_output_path, ExportOptions};
use hddviz::geometry::{LayerMethod, LayerLookup};
use hddviz::ingest::{DatasetKind, ParseError};
use hddviz::session::{DatasetState, Session, SessionError};
use hddviz::types::WaterBodyRegion;

const BORE_CSV: &str = "\
Joint #,Length,Inclination,L/R,Raw Azi.,Away,Elev.
1,15,-12,0.0,90.1,0,100
2,15,-12,0.4,90.0,15,96.8
3,15,-8,-0.6,89.8,30,94.1
4,15,0,1.2,90.3,45,93.0
5,15,6,0.3,90.0,60,94.5
6,15,12,-0.2,89.9,75,97.6
7,15,12,0.0,90.0,90,100.8
";

const SURFACE_CSV: &str = "\
Station,Elevation
-10,100.5
0,100
20,101
40,100.2
60,99.0
80,100.4
90,101
110,102
";

const BORING_A_CSV: &str = "\
STA,Zone Start Elevation (ft),Zone End Elevation (ft),Soil Description per Geotech Logs / Report
30,101,95,\"Lean clay (CL), brown\"
30,95,85,Silty sand (SM)
";

const BORING_B_CSV: &str = "\
STA,Zone Start Elevation (ft),Zone End Elevation (ft),Soil Description
70,100,92,Weathered limestone
70,92,80,Shale
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn options() -> ExportOptions {
    ExportOptions::from_config(&VizConfig::default().export).with_title("Mill Creek HDD")
}

#[tokio::test]
async fn full_crossing_exports_self_contained_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bore = write(dir.path(), "MillCreek.csv", BORE_CSV);
    let surface = write(dir.path(), "terrain.csv", SURFACE_CSV);
    let boring_a = write(dir.path(), "B-1.csv", BORING_A_CSV);
    let boring_b = write(dir.path(), "B-2.csv", BORING_B_CSV);

    let mut session = Session::new();
    session.load_bore(&bore).await.expect("bore");
    session.load_surface(&surface).await.expect("surface");
    session.load_boring_logs(&[boring_a, boring_b]).await.expect("boring logs");
    session.set_water_body(Some(WaterBodyRegion::new("Mill Creek", 50.0, 25.0, 99.5).expect("region")));

    let config = VizConfig::default();
    let dataset = session.assemble(LayerMethod::Auto, &config).expect("assemble");

    assert_eq!(dataset.summary.joint_count, 7);
    assert_eq!(dataset.summary.boring_station_count, 2);
    assert_eq!(dataset.summary.boring_file_count, 2);
    assert_eq!(dataset.summary.layer_method, LayerMethod::Depth);
    assert!(dataset.surface_profile.iter().all(|p| (0.0..=90.0).contains(&p.station_ft)));
    assert_eq!(dataset.boring_boxes.len(), 4);

    let water = dataset.water_volume.as_ref().expect("water volume");
    assert!((water.region.begin_station_ft - 25.0).abs() < 1e-9);

    // Ground at B-1 is 100.6 ft: joint 2 is ~4 ft deep, joint 3 ~6.5 ft
    let shallow = dataset.annotations[1].layer.as_ref().expect("joint 2 layer");
    assert!(shallow.soil_description.starts_with("Lean clay"));
    assert!((shallow.boring_station_ft - 30.0).abs() < 1e-9);
    let deeper = dataset.annotations[2].layer.as_ref().expect("joint 3 layer");
    assert_eq!(deeper.soil_description, "Silty sand (SM)");

    let output = resolve_output_path(None, &bore);
    assert_eq!(output, PathBuf::from("MillCreek.html"));

    let out_path = dir.path().join(output);
    export_html(&dataset, &options(), &out_path).expect("export");

    let html = std::fs::read_to_string(&out_path).expect("read output");
    assert!(placeholders_in(&html).is_empty());
    assert!(html.contains("<title>Mill Creek HDD</title>"));
    assert!(html.contains(r#""SoilDescription":"Lean clay (CL), brown""#));
    assert!(html.contains(r#""Name":"Mill Creek""#));
    assert!(html.contains(r#""FileName":"B-2.csv""#));
}

#[tokio::test]
async fn bore_only_export_uses_elevation_lookup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bore = write(dir.path(), "bore.csv", BORE_CSV);

    let mut session = Session::new();
    session.load_bore(&bore).await.expect("bore");

    let dataset = session.assemble(LayerMethod::Auto, &VizConfig::default()).expect("assemble");
    assert_eq!(dataset.summary.layer_method, LayerMethod::Elevation);
    assert!(dataset.water_volume.is_none());
    assert!(dataset.boring_boxes.is_empty());
    assert!(dataset
        .annotations
        .iter()
        .all(|a| a.depth_ft.is_none() && a.depth_display == "N/A"));

    let html = render_html(&dataset, &options()).expect("render");
    assert!(html.contains("const surfaceData = [];"));
    assert!(html.contains("const waterBody = null;"));
}

#[tokio::test]
async fn depth_lookup_without_surface_reports_no_surface() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bore = write(dir.path(), "bore.csv", BORE_CSV);
    let boring = write(dir.path(), "B-1.csv", BORING_A_CSV);

    let mut session = Session::new();
    session.load_bore(&bore).await.expect("bore");
    session.load_boring_logs(&[boring]).await.expect("boring logs");

    let dataset = session.assemble(LayerMethod::Depth, &VizConfig::default()).expect("assemble");
    assert!(dataset.annotations.iter().all(|a| a.layer.is_none()));
    assert_eq!(dataset.annotations[0].layer_note, LayerLookup::NoSurfaceData.to_string());
}

#[tokio::test]
async fn failed_surface_leaves_bore_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bore = write(dir.path(), "bore.csv", BORE_CSV);
    let surface = write(dir.path(), "terrain.csv", "Sta,Elev\n0,100\n");

    let mut session = Session::new();
    session.load_bore(&bore).await.expect("bore");
    session.load_surface(&surface).await.expect("state transition");

    assert!(session.bore.is_ready());
    assert!(session.surface.is_failed());

    let dataset = session.assemble(LayerMethod::Auto, &VizConfig::default()).expect("assemble");
    assert_eq!(dataset.summary.surface_point_count, 0);
}

#[tokio::test]
async fn missing_bore_columns_fail_the_bore() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bore = write(dir.path(), "bore.csv", "Joint #,Length,Away\n1,15,0\n");

    let mut session = Session::new();
    session.load_bore(&bore).await.expect("state transition");

    match &session.bore {
        DatasetState::Failed(reason) => {
            assert!(reason.contains("Elev."), "{reason}");
            assert!(reason.contains("Inclination"), "{reason}");
        }
        other => panic!("expected failed bore, got {other}"),
    }
    assert!(matches!(
        session.assemble(LayerMethod::Auto, &VizConfig::default()),
        Err(SessionError::BoreNotReady(_))
    ));
}

#[tokio::test]
async fn boring_log_batch_skips_bad_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = write(dir.path(), "B-1.csv", BORING_A_CSV);
    let headerless = write(dir.path(), "B-2.csv", "Station,Top,Bottom\n30,100,90\n");
    let missing = dir.path().join("B-3.csv");
    let unsupported = write(dir.path(), "B-4.txt", "not a spreadsheet");

    let batch = hddviz::ingest::load_boring_logs(&[good, headerless, missing, unsupported])
        .await
        .expect("one good file is enough");

    assert_eq!(batch.layers.len(), 2);
    assert_eq!(batch.file_count(), 1);
    let skipped: Vec<&str> = batch.skipped_files.iter().map(|w| w.file.as_str()).collect();
    assert_eq!(skipped, vec!["B-2.csv", "B-3.csv", "B-4.txt"]);
}

#[tokio::test]
async fn same_file_name_in_two_folders_counts_twice() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bore = write(dir.path(), "bore.csv", BORE_CSV);
    for sub in ["north", "south"] {
        std::fs::create_dir(dir.path().join(sub)).expect("mkdir");
    }
    let north = write(&dir.path().join("north"), "boring.csv", BORING_A_CSV);
    let south = write(&dir.path().join("south"), "boring.csv", BORING_B_CSV);

    let mut session = Session::new();
    session.load_bore(&bore).await.expect("bore");
    session.load_boring_logs(&[north.clone(), south]).await.expect("boring logs");

    let batch = session.boring_logs.ready().expect("batch ready");
    assert_eq!(batch.file_count(), 2);
    assert_eq!(batch.layers[0].source_file, north.display().to_string());

    let dataset = session.assemble(LayerMethod::Auto, &VizConfig::default()).expect("assemble");
    assert_eq!(dataset.summary.boring_file_count, 2);
}

#[tokio::test]
async fn boring_log_batch_with_no_good_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let headerless = write(dir.path(), "B-1.csv", "Station,Top\n1,2\n");

    let result = hddviz::ingest::load_boring_logs(&[headerless]).await;
    match result {
        Err(ParseError::AllFilesFailed { files }) => assert_eq!(files, vec!["B-1.csv".to_string()]),
        other => panic!("expected AllFilesFailed, got {other:?}"),
    }
}

#[test]
fn dataset_kind_names_read_naturally() {
    assert_eq!(DatasetKind::BoringLog.to_string(), "boring log");
}
