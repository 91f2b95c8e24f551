use crate::{
    client::GeneratedPayload, error::InvalidResponseShapeError, utils::is_identifier,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Api {
    pub name: String,
    pub code: String,
}

/// A reply that passed [`validate`] and is safe to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub procedure: Procedure,
    pub api: Api,
}

fn required(
    field: &'static str,
    value: Option<String>,
) -> Result<String, InvalidResponseShapeError> {
    let value = value.ok_or(InvalidResponseShapeError::Missing(field))?;
    if value.trim().is_empty() {
        return Err(InvalidResponseShapeError::Empty(field));
    }
    Ok(value)
}

fn identifier(
    field: &'static str,
    value: Option<String>,
) -> Result<String, InvalidResponseShapeError> {
    let value = required(field, value)?;
    if !is_identifier(&value) {
        return Err(InvalidResponseShapeError::NotAnIdentifier { field, value });
    }
    Ok(value)
}

pub fn validate(payload: GeneratedPayload) -> Result<GenerationResult, InvalidResponseShapeError> {
    let procedure = payload
        .procedure
        .ok_or(InvalidResponseShapeError::Missing("procedure"))?;
    let api = payload
        .api
        .ok_or(InvalidResponseShapeError::Missing("api"))?;
    Ok(GenerationResult {
        procedure: Procedure {
            name: identifier("procedure.name", procedure.name)?,
            sql: required("procedure.sql", procedure.sql)?,
        },
        api: Api {
            name: identifier("api.name", api.name)?,
            code: required("api.code", api.code)?,
        },
    })
}
