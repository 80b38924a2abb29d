use super::super::Authorizer;
use super::split::compute_split;
use crate::mandate::Mandate;
use crate::runtime::gate::GateInput;
use crate::runtime::pipeline::Pipeline;
use crate::runtime::request::PaymentRequest;
use crate::runtime::verdict::{DenyReason, Verdict};
use chrono::{DateTime, Utc};

pub(crate) fn evaluate_at_impl(
    authorizer: &Authorizer,
    now: DateTime<Utc>,
    pipeline: &Pipeline,
    mandate: &mut Mandate,
    request: &PaymentRequest,
) -> Verdict {
    let input = GateInput {
        mandate: &*mandate,
        request,
        now,
        signer: &authorizer.signer,
        global_trust_floor: authorizer.config.global_trust_floor,
    };

    match first_denial(pipeline, &input) {
        Some(reason) => deny_impl(mandate, reason),
        None => approve_impl(authorizer, pipeline, mandate, request),
    }
}

fn first_denial(pipeline: &Pipeline, input: &GateInput<'_>) -> Option<DenyReason> {
    for gate in pipeline.gates() {
        match gate.check(input) {
            Ok(()) => {
                tracing::debug!(mandate_id = %input.mandate.id(), gate = gate.name(), "gate passed");
            }
            Err(reason) => {
                tracing::debug!(
                    mandate_id = %input.mandate.id(),
                    gate = gate.name(),
                    reason = reason.code(),
                    "gate denied"
                );
                return Some(reason);
            }
        }
    }
    None
}

fn deny_impl(mandate: &mut Mandate, reason: DenyReason) -> Verdict {
    if matches!(reason, DenyReason::Expired { .. }) && mandate.mark_expired() {
        tracing::info!(mandate_id = %mandate.id(), "mandate expired");
    }

    match reason {
        DenyReason::SignatureMismatch => {
            tracing::warn!(mandate_id = %mandate.id(), reason = reason.code(), "payment denied");
        }
        _ => {
            tracing::info!(
                mandate_id = %mandate.id(),
                reason = reason.code(),
                retryable = reason.is_retryable(),
                "payment denied"
            );
        }
    }

    Verdict::deny(mandate, reason)
}

fn approve_impl(
    authorizer: &Authorizer,
    pipeline: &Pipeline,
    mandate: &mut Mandate,
    request: &PaymentRequest,
) -> Verdict {
    let split = pipeline
        .splits_donation()
        .then(|| compute_split(request.amount, mandate.constraints().auto_donation_rate));

    if authorizer.single_use() {
        // Status gate already passed, so the mandate is active here.
        if let Err(e) = mandate.mark_exhausted() {
            tracing::warn!(mandate_id = %mandate.id(), error = %e, "single-use exhaust failed");
        }
    }

    tracing::info!(
        mandate_id = %mandate.id(),
        amount = request.amount,
        community_fund = split.map(|s| s.community_fund),
        "payment approved"
    );

    Verdict::approve(mandate, split)
}
