//! Sample data for local development.

use anyhow::{bail, Result};
use serde_json::{json, Value};

use crate::db::Database;
use crate::models::ExperimentFilter;
use crate::validation;

/// Raw payloads in the same shape clients send to `POST /experiments`.
pub fn sample_experiments() -> Vec<Value> {
    vec![
        json!({
            "title": "AI Model Training Phase 1",
            "description": "Initial training of neural network models for image recognition",
            "status": "completed",
            "category": "research",
            "startDate": "2023-01-15",
            "endDate": "2023-03-15",
            "budget": 75000,
            "researcher": "Dr. Emily Chen",
            "team": [
                { "name": "Alex Wong", "role": "ML Engineer", "email": "alex@example.com" },
                { "name": "Jessica Brown", "role": "Data Scientist", "email": "jessica@example.com" }
            ],
            "objectives": ["Achieve 85% accuracy", "Reduce training time by 30%", "Document results"],
            "methodology": "Supervised learning with cross-validation",
            "expectedOutcomes": "Production-ready model",
            "priority": "high",
            "tags": ["ai", "ml", "research"],
            "results": {
                "status": "successful",
                "findings": "Achieved 89% accuracy on test set",
                "metrics": { "accuracy": 0.89, "loss": 0.0234 }
            }
        }),
        json!({
            "title": "Database Performance Optimization",
            "description": "Testing and optimizing database queries for production environment",
            "status": "ongoing",
            "category": "testing",
            "startDate": "2024-01-01",
            "endDate": "2024-02-28",
            "budget": 45000,
            "researcher": "Prof. Michael Rodriguez",
            "team": [
                { "name": "Sarah Kim", "role": "Database Admin", "email": "sarah@example.com" }
            ],
            "objectives": ["Reduce query time by 40%", "Increase throughput", "Load testing"],
            "methodology": "Benchmark testing and profiling",
            "priority": "critical",
            "tags": ["database", "performance", "optimization"]
        }),
        json!({
            "title": "Blockchain Smart Contract Audit",
            "description": "Security audit and validation of smart contracts",
            "status": "planned",
            "category": "validation",
            "startDate": "2024-02-01",
            "endDate": "2024-03-01",
            "budget": 60000,
            "researcher": "Dr. James Miller",
            "team": [
                { "name": "Mark Johnson", "role": "Security Analyst", "email": "mark@example.com" },
                { "name": "Lisa Garcia", "role": "Smart Contract Dev", "email": "lisa@example.com" }
            ],
            "objectives": ["Identify vulnerabilities", "Verify contract logic"],
            "priority": "high",
            "tags": ["blockchain", "security", "audit"]
        }),
        json!({
            "title": "Sensor Array Prototype",
            "description": "Prototype of a low-power environmental sensor array",
            "status": "paused",
            "category": "prototype",
            "startDate": "2023-09-01",
            "budget": 12000,
            "researcher": "Dr. Emily Chen",
            "objectives": ["Validate power budget", "Field test for two weeks"],
            "priority": "low",
            "tags": ["hardware", "iot"],
            "notes": "Waiting on replacement boards",
            "customFields": { "lab": "B2", "boardRevision": 3 }
        }),
    ]
}

/// Replace the whole collection with [`sample_experiments`].
///
/// Returns the number of experiments stored afterwards.
pub fn seed(db: &Database) -> Result<u64> {
    replace_all(db, &sample_experiments())
}

/// Validate every payload, then replace the collection with them.
///
/// Nothing is removed if any payload is invalid.
pub fn replace_all(db: &Database, payloads: &[Value]) -> Result<u64> {
    let mut inputs = Vec::with_capacity(payloads.len());
    for (i, raw) in payloads.iter().enumerate() {
        match validation::validate_create(raw) {
            Ok(input) => inputs.push(input),
            Err(violations) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                bail!("sample experiment {} failed validation: {}", i, fields.join(", "));
            }
        }
    }

    let removed = db.delete_all_experiments()?;
    tracing::info!("Cleared {} existing experiments", removed);

    for input in inputs {
        let experiment = db.create_experiment(input)?;
        tracing::debug!("Seeded experiment {} ({})", experiment.id, experiment.title);
    }

    db.count_experiments(&ExperimentFilter::default())
}
