//! attex-sign
//!
//! The signing envelope: give it a claim and a processor document, and it
//! runs validate → parse claim → execute → ABI-encode → sign, returning a
//! `ProcessedClaimData` whose signature the on-chain verifier can recover
//! against the attestor address. Every failure surfaces as one aborted
//! operation; no partial artifact is ever produced.

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use attex_core::error::AttexError;
use attex_core::types::{Hash32, ProcessedClaimData, ProviderClaimData};

pub use attex_crypto::{recover_address, AttestorSigner, SignatureMode};

/// The process-wide claim-processing pipeline. Holds the attestor key
/// (read-only after boot), the deployment's signature mode, and an optional
/// server-imposed processor version.
pub struct ClaimProcessor {
    signer: AttestorSigner,
    mode: SignatureMode,
    version: Option<String>,
}

impl ClaimProcessor {
    pub fn new(signer: AttestorSigner, mode: SignatureMode) -> Self {
        Self {
            signer,
            mode,
            version: None,
        }
    }

    /// Impose a server-side processor version: injected into every
    /// document before identity hashing, overriding any version the
    /// document carries.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The address recoverable from every signature this envelope produces.
    pub fn attestor_address(&self) -> String {
        self.signer.address()
    }

    /// Process one claim under one processor document.
    pub fn process(
        &self,
        claim: &ProviderClaimData,
        processor_doc: &JsonValue,
    ) -> Result<ProcessedClaimData, AttexError> {
        let doc = self.versioned(processor_doc);

        let processor = attex_validate::parse_and_validate(&doc).map_err(|e| {
            warn!(provider = %claim.provider, error = %e, "processor rejected");
            e
        })?;
        let provider_hash = attex_exec::provider_hash(claim)?;
        let values = attex_exec::execute(&processor, claim)?;

        let pph = attex_abi::processor_provider_hash(&provider_hash, &doc);
        let message_hash = attex_abi::message_hash(&pph, &processor.outputs, &values)?;
        let signature = self
            .signer
            .sign_hash(&self.mode.digest(message_hash.as_bytes()))
            .map_err(|e| AttexError::Signer(e.to_string()))?;

        info!(
            provider = %claim.provider,
            outputs = values.len(),
            pph = %pph,
            "claim processed and signed"
        );
        Ok(ProcessedClaimData {
            processor_provider_hash: pph,
            signature,
            outputs: processor.outputs,
            values,
        })
    }

    /// Recompute the message hash for an already-processed artifact, e.g.
    /// to verify a signature off-chain.
    pub fn message_hash(processed: &ProcessedClaimData) -> Result<Hash32, AttexError> {
        attex_abi::message_hash(
            &processed.processor_provider_hash,
            &processed.outputs,
            &processed.values,
        )
    }

    fn versioned(&self, doc: &JsonValue) -> JsonValue {
        match &self.version {
            Some(version) => {
                let mut doc = doc.clone();
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert("version".into(), JsonValue::String(version.clone()));
                }
                doc
            }
            None => doc.clone(),
        }
    }
}
