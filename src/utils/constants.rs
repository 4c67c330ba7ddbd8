/// CSV column names
pub const COL_YEAR: &str = "ano";
pub const COL_STATE: &str = "sigla_uf";
pub const COL_MUNICIPALITY_ID: &str = "id_municipio";
pub const COL_BIOME: &str = "bioma";
pub const COL_DETECTION_ID: &str = "id_bdq";
pub const COL_OCCURRENCE_ID: &str = "id_foco";
pub const COL_TIMESTAMP: &str = "data_hora";
pub const COL_CENTROID: &str = "centroide";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_YEAR,
    COL_STATE,
    COL_MUNICIPALITY_ID,
    COL_BIOME,
    COL_DETECTION_ID,
    COL_OCCURRENCE_ID,
    COL_TIMESTAMP,
    COL_CENTROID,
];

/// Accepted `data_hora` layouts, tried in order
pub const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Record constraints
pub const MIN_VALID_YEAR: i32 = 1900;
pub const MAX_VALID_YEAR: i32 = 2100;

/// Directory service
pub const DEFAULT_DIRECTORY_URL: &str =
    "https://servicodados.ibge.gov.br/api/v1/localidades/distritos";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;
pub const MAX_FETCH_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Report defaults
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_HEX_SIZE: f64 = 0.5;
pub const DEFAULT_CHART_WIDTH: u32 = 1280;
pub const DEFAULT_CHART_HEIGHT: u32 = 800;
pub const DEFAULT_CONFIG_FILE: &str = "queimadas.toml";
pub const ENV_PREFIX: &str = "QUEIMADAS";

/// Number of skip reasons echoed in the load summary
pub const SKIP_REASONS_SHOWN: usize = 10;

/// Label used for grouped-away pie slices
pub const OTHERS_LABEL: &str = "Outros";
