
use impvol_lib::io::{self, MISSING_VALUE, OUTPUT_HEADER};
use impvol_lib::{
    compute_option_records, compute_record, default_configs, plot, run_pipeline, BisectionConfig,
    OptionKind, VolError, VolatilitySummary,
};
use test_utils::{assert_close, load_sample_quotes, raw_quote, repaired_quote, sample_config};

/// Implied volatilities of the seven well-formed sample rows
const SAMPLE_IVS: [f64; 7] = [1.3121, 1.3413, 1.5807, 1.4435, 1.4640, 2.5695, 3.2794];

#[test]
fn test_sample_ingestion_skips_bad_lines() {
    let quotes = load_sample_quotes();

    // Short line and PUT line are dropped
    assert_eq!(quotes.len(), 8);
    assert!(quotes.iter().all(|q| q.kind == OptionKind::Call));
    assert_eq!(quotes[0].ask, "178,999");
    assert_eq!(quotes[1].bid, "");
    assert_eq!(quotes[7].created_at, "2023-10-19 17:00");
}

#[test]
fn test_sample_repair() {
    let records = run_pipeline(&load_sample_quotes(), &sample_config());

    assert_eq!(records[0].ask, Some(178.999));
    assert_eq!(records[1].bid, Some(135.0));
    assert_close(records[2].under_bid.unwrap(), 1182.2, 1e-9, "under bid");
    assert_eq!(records[4].ask, Some(169.0));
}

#[test]
fn test_sample_implied_volatilities() {
    let records = run_pipeline(&load_sample_quotes(), &sample_config());
    assert_eq!(records.len(), 8);

    for (record, expected) in records.iter().zip(SAMPLE_IVS) {
        let iv = record
            .implied_volatility
            .clone()
            .unwrap_or_else(|e| panic!("{}: {e}", record.created_at));
        assert_close(iv, expected, 1e-3, &record.created_at);
    }

    let first = &records[0];
    assert_close(first.price.unwrap(), 154.4995, 1e-9, "price");
    assert_close(first.under_price.unwrap(), 1182.675, 1e-9, "under price");
    assert_close(first.intrinsic_value.unwrap(), 149.675, 1e-9, "intrinsic");
    assert_close(first.extrinsic_value.unwrap(), 4.8245, 1e-9, "extrinsic");
    assert_close(first.under_volatility.clone().unwrap(), 0.391_893, 1e-6, "under vol");
    assert_close(first.years_to_expiry.clone().unwrap(), 0.004_075_342, 1e-9, "years");
    assert_eq!(first.strike, 1033.0);
    assert_eq!(first.description, "GFGC1033OC");
}

/// A bad timestamp keeps the row, marks the timing fields unavailable and
/// still computes the quote-only fields.
#[test]
fn test_bad_timestamp_row_is_kept() {
    let records = run_pipeline(&load_sample_quotes(), &sample_config());
    let last = &records[7];

    assert!(matches!(
        last.years_to_expiry,
        Err(VolError::InvalidTimestamp { .. })
    ));
    assert!(matches!(
        last.implied_volatility,
        Err(VolError::NotPriceable { .. })
    ));
    assert_eq!(last.price, Some(161.0));
    assert!(last.under_volatility.is_ok());
}

#[test]
fn test_empty_timestamp() {
    let record = compute_record(&repaired_quote(Some(150.0), ""), &sample_config());
    assert!(matches!(
        record.years_to_expiry,
        Err(VolError::InvalidTimestamp { .. })
    ));
    assert!(record.implied_volatility.is_err());
}

/// A column missing everywhere stays unavailable without aborting the batch.
#[test]
fn test_unrecoverable_column() {
    let raw = vec![
        raw_quote("130", "178,999", "", "1184,85", "10/18/2023 12:18"),
        raw_quote("140", "176,5", "", "1186,2", "10/18/2023 12:40"),
    ];
    let records = run_pipeline(&raw, &sample_config());

    for record in &records {
        assert_eq!(record.under_bid, None);
        assert_eq!(record.under_price, None);
        assert_eq!(record.intrinsic_value, None);
        assert!(matches!(
            record.under_volatility,
            Err(VolError::MissingQuote { field: "under_bid" })
        ));
        assert!(matches!(
            record.implied_volatility,
            Err(VolError::NotPriceable { .. })
        ));
        assert!(record.price.is_some());
    }
}

/// Valuation after expiry is not priceable.
#[test]
fn test_expired_row() {
    let config = sample_config().with_expiration_date("17/10/2023");
    let record = compute_record(&repaired_quote(Some(150.0), "10/18/2023 12:18"), &config);
    assert!(matches!(
        record.years_to_expiry,
        Err(VolError::ExpirationBeforeValuation { .. })
    ));
    assert!(matches!(
        record.implied_volatility,
        Err(VolError::NotPriceable { .. })
    ));
}

/// A tight iteration budget surfaces as NotConverged, never as a number.
#[test]
fn test_non_convergence_is_explicit() {
    let config = sample_config().with_solver(BisectionConfig::default().with_max_iterations(3));
    let records = run_pipeline(&load_sample_quotes(), &config);

    assert!(matches!(
        records[0].implied_volatility,
        Err(VolError::NotConverged { iterations: 3, .. })
    ));
}

#[test]
fn test_configured_description_overrides_rows() {
    let mut config = sample_config();
    config.description = Some("GGAL Oct 1033 C".to_string());
    let records = run_pipeline(&load_sample_quotes(), &config);
    assert!(records.iter().all(|r| r.description == "GGAL Oct 1033 C"));
}

#[test]
fn test_invalid_config_rejected() {
    let quotes = load_sample_quotes();
    let config = default_configs::standard().with_expiration_date("2023-10-20");
    assert!(compute_option_records(&quotes, &config).is_err());

    let config = default_configs::standard().with_strike(0.0);
    assert!(compute_option_records(&quotes, &config).is_err());
}

#[test]
fn test_presets_agree() {
    let quotes = load_sample_quotes();
    let precise = compute_option_records(&quotes, &default_configs::precise()).unwrap();
    let fast = compute_option_records(&quotes, &default_configs::fast()).unwrap();

    let a = precise[0].implied_volatility.clone().unwrap();
    let b = fast[0].implied_volatility.clone().unwrap();
    assert_close(a, b, 1e-3, "preset agreement");
}

#[test]
fn test_output_csv() {
    let records = run_pipeline(&load_sample_quotes(), &sample_config());

    let mut buffer = Vec::new();
    io::write_option_records_to_writer(&mut buffer, &records).unwrap();

    let mut rdr = csv::Reader::from_reader(buffer.as_slice());
    let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, OUTPUT_HEADER);

    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(&rows[0][0], "GFGC1033OC");
    assert_eq!(&rows[0][2], "CALL");
    assert_eq!(&rows[0][7], "10/18/2023 12:18");

    let iv: f64 = rows[0][12].parse().unwrap();
    assert_close(iv, SAMPLE_IVS[0], 1e-3, "implied volatility column");

    // Unavailable values are written as -1
    let last = &rows[7];
    assert_eq!(last[12].parse::<f64>().unwrap(), MISSING_VALUE);
    assert_eq!(last[14].parse::<f64>().unwrap(), MISSING_VALUE);
}

/// Whole numbers are written without a fractional part.
#[test]
fn test_output_number_format() {
    let records = run_pipeline(&load_sample_quotes(), &sample_config());

    let mut buffer = Vec::new();
    io::write_option_records_to_writer(&mut buffer, &records).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let first = text.lines().nth(1).unwrap();
    let last = text.lines().nth(8).unwrap();

    assert!(
        first.starts_with("GFGC1033OC,1033,CALL,130,178.999,1180.5,1184.85,10/18/2023 12:18,"),
        "{first}"
    );

    let cells: Vec<&str> = last.split(',').collect();
    assert_eq!(cells[12], "-1");
    assert_eq!(cells[14], "-1");
}

#[test]
fn test_output_file_and_plots() {
    let dir = tempfile::tempdir().unwrap();
    let records = compute_option_records(&load_sample_quotes(), &sample_config()).unwrap();

    let output = dir.path().join("output.csv");
    io::write_option_records(&output, &records).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 9);
    assert!(text.starts_with("Description,Strike,Kind,Bid,Ask"));

    let series = dir.path().join("volatility.svg");
    let premium = dir.path().join("volatility_premium.svg");
    plot::plot_volatility_series(&records, &series).unwrap();
    plot::plot_volatility_premium(&records, &premium).unwrap();
    let series_svg = std::fs::read_to_string(series).unwrap();
    let premium_svg = std::fs::read_to_string(premium).unwrap();
    assert!(series_svg.contains("<svg"));
    assert!(premium_svg.contains("<svg"));

    // Ticks carry the sample timestamps
    assert!(series_svg.contains("Created At"));
    assert!(records
        .iter()
        .any(|r| series_svg.contains(r.created_at.as_str())));
}

#[test]
fn test_plot_rejects_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    assert!(plot::plot_volatility_series(&[], dir.path().join("empty.svg")).is_err());
}

#[test]
fn test_summary() {
    let records = run_pipeline(&load_sample_quotes(), &sample_config());
    let summary = VolatilitySummary::from_records(&records);

    assert_eq!(summary.rows, 8);
    assert_eq!(summary.converged, 7);

    let implied = summary.implied.unwrap();
    assert_eq!(implied.count, 7);
    let mean = SAMPLE_IVS.iter().sum::<f64>() / 7.0;
    assert_close(implied.mean, mean, 1e-3, "mean implied volatility");
    assert_close(implied.max, 3.2794, 1e-3, "max implied volatility");

    // Every row has both underlying quotes
    assert_eq!(summary.underlying.unwrap().count, 8);
    assert_eq!(summary.premium.unwrap().count, 7);

    let text = summary.to_string();
    assert!(text.starts_with("8 rows, 7 with implied volatility"));
}
