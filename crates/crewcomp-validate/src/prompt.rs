//! Prompt construction for the reasoning service.
//!
//! The system prompt fixes the output contract (one raw JSON object); the
//! user prompt embeds the candidate claim, its source trip, and the
//! contract-rules corpus the service judges against.

use crewcomp_core::{CandidateClaim, Trip};

/// Contract-rule excerpts the reasoning service validates against. Fixed
/// text: the service sees the same corpus for every claim.
pub const RULES_CORPUS: &str = "\
CONTRACT RULES (excerpts):

[5.A] Per diem. Crew members are paid an hourly allowance for time away \
from base, measured from one hour before scheduled departure to thirty \
minutes after scheduled arrival. Domestic and international trips pay \
different hourly rates.

[5.D] International override. Block time on a trip crossing an \
international boundary pays an hourly override, with a guaranteed minimum \
payment per trip.

[12.C] Extended duty. A duty period exceeding 12:30 pays double time on \
the excess; a duty period exceeding 16:00 pays triple time on the excess, \
at the contractual base hourly rate.

[8.B] Holiday pay. Block hours flown on a listed company holiday pay a \
100% premium over the base hourly rate.

[20.F] Claims must reference a completed trip and must not duplicate an \
existing claim for the same trip and entitlement.";

/// Output contract for the reasoning service.
pub const SYSTEM_PROMPT: &str = "\
You are a crew-pay compliance validator for an airline.

Given one candidate entitlement claim, the trip it was detected from, and \
the relevant contract rules, assess whether the claim is valid under the \
rules.

Respond ONLY with a JSON object. No markdown fences, no explanation, just \
raw JSON:
{
  \"is_valid\": true or false,
  \"confidence\": 0-100,
  \"recommendation\": \"auto_approve\" | \"manual_review\" | \"reject\",
  \"reasoning\": \"one short paragraph\",
  \"contract_references\": [\"rule section ids, e.g. '5.A'\"]
}

Guideline: recommend auto_approve only when confidence exceeds 95. When in \
doubt, recommend manual_review.";

/// Build the user prompt for one candidate/trip pair.
pub fn build_user_prompt(candidate: &CandidateClaim, trip: &Trip) -> String {
    let evidence =
        serde_json::to_string(&candidate.evidence).unwrap_or_else(|_| "{}".to_string());
    format!(
        "Candidate claim:\n\
         - entitlement: {entitlement}\n\
         - amount: ${amount:.2}\n\
         - description: {description}\n\
         - detection method: {method}\n\
         - detector confidence: {prior:.0}\n\
         - evidence: {evidence}\n\
         \n\
         Trip {trip_id} ({origin} -> {destination}), {date}:\n\
         - scheduled: {dep} -> {arr}\n\
         - block hours: {block:.2}, flight time: {flight:.2}, credit: {credit:.2}\n\
         - international: {international}\n\
         - crew member: {crew}\n\
         \n\
         {rules}",
        entitlement = candidate.entitlement,
        amount = candidate.amount,
        description = candidate.description,
        method = candidate.method,
        prior = candidate.prior_confidence,
        evidence = evidence,
        trip_id = trip.trip_id,
        origin = trip.origin,
        destination = trip.destination,
        date = trip.trip_date,
        dep = trip.scheduled_departure.to_rfc3339(),
        arr = trip.scheduled_arrival.to_rfc3339(),
        block = trip.block_hours,
        flight = trip.flight_time_hours,
        credit = trip.credit_hours,
        international = trip.is_international,
        crew = trip.crew_id,
        rules = RULES_CORPUS,
    )
}
