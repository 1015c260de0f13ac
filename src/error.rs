use thiserror::Error;

/// Failures decoding route JSON, configuration or report CSV.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("JSON inválido: {0}")]
    Json(String),
    #[error("El JSON debe ser un array de rutas")]
    NotAnArray,
    /// `index` is 1-based, matching what the user sees in their document.
    #[error("Ruta {index} tiene formato incorrecto: {reason}")]
    MalformedEntry { index: usize, reason: String },
    #[error("Fila {row} del CSV inválida: {reason}")]
    CsvRow { row: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Coordenada fuera de rango: ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("Ya existe una ruta con el nombre \"{0}\"")]
    DuplicateName(String),
    #[error("Una ruta debe tener al menos {minimum} estaciones")]
    MinimumStations { minimum: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Error de red: {0}")]
    Network(String),
    #[error("El nombre no puede estar vacío")]
    EmptyName,
    #[error("No hay ninguna ruta en creación o edición")]
    NoActiveLine,
    #[error("No hay puntos en la ruta actual")]
    EmptyLine,
    #[error("La ruta {0} no existe")]
    LineNotFound(usize),
    #[error("La estación {0} no existe")]
    StationNotFound(usize),
    #[error("El punto de corrección {0} no existe")]
    CorrectionPointNotFound(usize),
}

impl EditorError {
    /// Unreachable services are reported as a plain notice; anything else as an error toast.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
