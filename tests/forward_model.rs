use anyhow::Result;
use pmtsim::io::{RunLabel, read_truth, write_integrals, write_truth};
use pmtsim::sim::config::DistributionConfig;
use pmtsim::{
    Calibration, Distribution, Energy, ForwardSimulation, PlaneGeometry, Point, PositionSampler,
    ResponseModel, RunConfig, SimError,
};

fn lime_geometry() -> PlaneGeometry {
    PlaneGeometry::new(50.0, 80.0, 59.0).unwrap()
}

#[test]
fn test_event_below_pmt_is_at_separation() -> Result<()> {
    let geom = lime_geometry();
    let sampler = PositionSampler::new(geom);
    let dist = Distribution::from_name("fixedY", &[25.0, 25.0, 40.0])?;
    let events = sampler.sample(1, &dist)?;
    assert_eq!(events, vec![Point::new(25.0, 40.0)]);

    let model = ResponseModel::new(geom, Calibration::default())?;
    let dm = model.distance_matrix(&[Point::new(25.0, 40.0)], &events)?;
    assert_eq!(dm.dim(), (1, 1));
    assert_eq!(dm[[0, 0]], 59.0);
    Ok(())
}

#[test]
fn test_duplicate_pmts_give_duplicate_columns() -> Result<()> {
    let geom = lime_geometry();
    let model = ResponseModel::new(geom, Calibration::default())?;
    let pmts = vec![Point::new(10.0, 10.0), Point::new(10.0, 10.0)];
    let events = vec![Point::new(25.0, 40.0)];
    let dm = model.distance_matrix(&pmts, &events)?;
    assert_eq!(dm.dim(), (1, 2));
    assert_eq!(dm[[0, 0]], dm[[0, 1]]);

    let expected = (59.0f64.powi(2) + 15.0f64.powi(2) + 30.0f64.powi(2)).sqrt();
    assert!((dm[[0, 0]] - expected).abs() < 1e-12);

    let im = model.integrals(&dm, &Energy::Scalar(5.9))?;
    assert_eq!(im[[0, 0]], im[[0, 1]]);
    Ok(())
}

#[test]
fn test_calibration_paths_agree_at_reference_separation() -> Result<()> {
    let cal = Calibration::default();
    let geom = PlaneGeometry::new(50.0, 80.0, cal.reference_separation)?;

    let quadratic = ResponseModel::new(geom, cal.with_rescale(true))?;
    let quartic = ResponseModel::new(geom, cal.with_rescale(false))?;
    let a_quad = quadratic.calibration_constant();
    let a_quart = quartic.calibration_constant();
    assert!(
        ((a_quad - a_quart) / a_quart).abs() < 1e-12,
        "A_corr mismatch at reference: {a_quad} vs {a_quart}"
    );
    Ok(())
}

#[test]
fn test_calibration_paths_scale_with_separation() -> Result<()> {
    let cal = Calibration::default();
    let z_ref = cal.reference_separation;
    let base = PlaneGeometry::new(50.0, 80.0, z_ref)?;
    let far = base.with_separation(1.5 * z_ref)?;

    let a0 = ResponseModel::new(base, cal)?.calibration_constant();
    let a1 = ResponseModel::new(far, cal)?.calibration_constant();
    assert!((a1 / a0 - 1.5f64.powi(2)).abs() < 1e-12);

    let quartic = cal.with_rescale(false);
    let b0 = ResponseModel::new(base, quartic)?.calibration_constant();
    let b1 = ResponseModel::new(far, quartic)?.calibration_constant();
    assert!((b1 / b0 - 1.5f64.powi(4)).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_geometries_coexist() -> Result<()> {
    let near = ResponseModel::new(lime_geometry().with_separation(40.0)?, Calibration::default())?;
    let far = ResponseModel::new(lime_geometry(), Calibration::default())?;
    let events = vec![Point::new(25.0, 40.0)];
    let pmt = Point::new(25.0, 40.0);
    assert_eq!(near.distance_to(&pmt, &events), vec![40.0]);
    assert_eq!(far.distance_to(&pmt, &events), vec![59.0]);
    Ok(())
}

#[test]
fn test_grid_run_end_to_end() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let truth_path = dir.path().join("grid_mc_truth.txt");
    let integrals_path = dir.path().join("grid_integrals.txt");

    let mut config = RunConfig::new();
    config.num_events = 12;
    config.distribution = DistributionConfig::new("grid", vec![5.0, 45.0, 10.0, 70.0, 3.0]);
    config.output.run = 4242;
    config.output.trigger = 1;
    config.output.channels = vec![1, 2, 5, 6];

    let sim = ForwardSimulation::new(config)?;
    let result = sim.run()?;
    assert_eq!(result.num_events(), 12);

    // Row-major lattice: 4 columns per row, 3 rows
    assert_eq!(result.positions[0], Point::new(5.0, 10.0));
    assert_eq!(result.positions[3], Point::new(45.0, 10.0));
    assert_eq!(result.positions[4], Point::new(5.0, 40.0));
    assert_eq!(result.positions[11], Point::new(45.0, 70.0));

    write_truth(&truth_path, &result.positions)?;
    let out = &sim.config().output;
    let label = RunLabel {
        run: out.run,
        trigger: out.trigger,
    };
    write_integrals(&integrals_path, label, &result.integrals, &out.channels)?;

    assert_eq!(read_truth(&truth_path)?, result.positions);

    let content = std::fs::read_to_string(&integrals_path)?;
    let rows: Vec<&str> = content.lines().collect();
    assert_eq!(rows.len(), 12);
    for (i, row) in rows.iter().enumerate() {
        let cols: Vec<&str> = row.split('\t').collect();
        assert_eq!(cols.len(), 8);
        assert_eq!(cols[0], "4242");
        assert_eq!(cols[1], i.to_string());
        assert_eq!(cols[2], "1");
        assert_eq!(cols[3], "0");
        for (k, &ch) in [1usize, 2, 5, 6].iter().enumerate() {
            let value: f64 = cols[4 + k].parse()?;
            assert_eq!(value, result.integrals[[i, ch]]);
        }
    }
    Ok(())
}

#[test]
fn test_uniform_run_is_seeded() -> Result<()> {
    let mut config = RunConfig::new();
    config.num_events = 100;
    config.seed = Some(2024);
    let a = ForwardSimulation::new(config.clone())?.run()?;
    let b = ForwardSimulation::new(config)?.run()?;
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.distances, b.distances);
    Ok(())
}

#[test]
fn test_errors_are_local_to_the_call() -> Result<()> {
    let geom = lime_geometry();
    let sampler = PositionSampler::new(geom);
    let grid = Distribution::from_name("grid", &[0.0, 50.0, 0.0, 80.0, 4.0])?;

    assert!(matches!(
        sampler.sample(10, &grid),
        Err(SimError::InvalidSampling(_))
    ));
    // The same sampler keeps working
    assert_eq!(sampler.sample(8, &grid)?.len(), 8);

    let model = ResponseModel::new(geom, Calibration::default())?;
    let events = sampler.sample(8, &grid)?;
    let dm = model.distance_matrix(&[Point::new(25.0, 40.0)], &events)?;
    assert!(matches!(
        model.integrals(&dm, &Energy::PerEvent(vec![1.0; 7])),
        Err(SimError::EnergySizeMismatch {
            expected: 8,
            actual: 7
        })
    ));
    assert!(model.integrals(&dm, &Energy::PerEvent(vec![1.0; 8])).is_ok());
    Ok(())
}

#[test]
fn test_invalid_geometry_is_fatal() {
    assert!(matches!(
        PlaneGeometry::new(50.0, 80.0, 0.0),
        Err(SimError::InvalidGeometry(_))
    ));
    let json = r#"{"geometry": {"width": 50.0, "height": -80.0, "plane_to_array_z": 59.0}}"#;
    assert!(RunConfig::from_json_str(json).is_err());
}

#[test]
fn test_shipped_config_runs() -> Result<()> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/grid_scan.json");
    let config = RunConfig::from_json_file(&path)?;
    assert_eq!(config.pmts.len(), 8);
    let result = ForwardSimulation::new(config)?.run()?;
    assert_eq!(result.num_events(), 200);
    assert!(result.integrals.iter().all(|&v| v > 0.0));
    Ok(())
}
