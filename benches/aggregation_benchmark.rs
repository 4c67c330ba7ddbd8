use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use queimadas_report::analyzers::{
    counts_by_hour, counts_by_month, hexbin, top_centroids, top_n_by_group,
    yearly_variance_by_state, FireAnalyzer, GroupKey,
};
use queimadas_report::models::{Centroid, FireRecord};
use queimadas_report::readers::RecordReader;

const STATES: [&str; 6] = ["PA", "MT", "AM", "TO", "MA", "RO"];
const BIOMES: [&str; 4] = ["Amazônia", "Cerrado", "Caatinga", "Pantanal"];

// Deterministic synthetic detections spread over years, states and a grid of centroids
fn create_test_records(count: usize) -> Vec<FireRecord> {
    (0..count)
        .map(|i| {
            let year = 2015 + (i % 8) as i32;
            let timestamp = NaiveDate::from_ymd_opt(year, (i % 12) as u32 + 1, (i % 28) as u32 + 1)
                .unwrap()
                .and_hms_opt((i % 24) as u32, (i % 60) as u32, 0)
                .unwrap();
            let centroid = (i % 10 != 0).then(|| {
                Centroid::new(-60.0 + (i % 97) as f64 * 0.2, -15.0 + (i % 53) as f64 * 0.25)
            });

            FireRecord::new(
                year,
                STATES[i % STATES.len()].to_string(),
                1_500_000 + (i % 400) as u32,
                Some(BIOMES[i % BIOMES.len()].to_string()),
                format!("bdq-{}", i),
                format!("foco-{}", i),
                timestamp,
                centroid,
            )
        })
        .collect()
}

fn create_test_csv(rows: usize) -> String {
    let mut csv = String::from("ano,sigla_uf,id_municipio,bioma,id_bdq,id_foco,data_hora,centroide\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},2020-08-{:02} {:02}:15:00,POINT({} {})\n",
            2020,
            STATES[i % STATES.len()],
            1_500_000 + i % 400,
            BIOMES[i % BIOMES.len()],
            i,
            i,
            i % 28 + 1,
            i % 24,
            -55.0 + (i % 50) as f64 * 0.1,
            -10.0 + (i % 30) as f64 * 0.1
        ));
    }
    csv
}

fn benchmark_rankings(c: &mut Criterion) {
    let records = create_test_records(10_000);

    c.bench_function("top_n_by_municipality", |b| {
        b.iter(|| black_box(top_n_by_group(&records, GroupKey::MunicipalityId, 10)))
    });
    c.bench_function("counts_by_month_and_hour", |b| {
        b.iter(|| {
            black_box(counts_by_month(&records));
            black_box(counts_by_hour(&records))
        })
    });
    c.bench_function("top_centroids", |b| {
        b.iter(|| black_box(top_centroids(&records, 10)))
    });
}

fn benchmark_variance_and_hexbin(c: &mut Criterion) {
    let records = create_test_records(10_000);

    c.bench_function("yearly_variance_by_state", |b| {
        b.iter(|| black_box(yearly_variance_by_state(&records)))
    });
    c.bench_function("hexbin_half_degree", |b| {
        b.iter(|| black_box(hexbin(&records, 0.5)))
    });
}

fn benchmark_csv_loading(c: &mut Criterion) {
    let csv = create_test_csv(5_000);
    let reader = RecordReader::new();

    c.bench_function("load_records_from_str", |b| {
        b.iter(|| {
            let outcome = reader.load_records_from_str(black_box(&csv)).unwrap();
            black_box(outcome.records.len())
        })
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis_by_size");

    for &size in &[1_000, 10_000, 50_000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &count| {
            let records = create_test_records(count);
            let analyzer = FireAnalyzer::new();
            b.iter(|| black_box(analyzer.analyze(&records).unwrap().hex_cells.len()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rankings,
    benchmark_variance_and_hexbin,
    benchmark_csv_loading,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
