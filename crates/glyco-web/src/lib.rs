//! # Glyco Web Dashboard
//!
//! Browser front end for diabetes status prediction.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the web server
//! cargo run -p glyco-web -- --model random_forest_model.json --port 3000
//!
//! # Open http://localhost:3000 in your browser
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/schema` | Input features with ranges, class labels |
//! | POST | `/api/predict` | Prediction, probabilities, explanation, chart, tips |
//! | GET | `/api/health` | Liveness and model summary |

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
