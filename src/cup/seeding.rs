use crate::cup::format::SeedingPolicy;
use crate::cup::{CupError, Division, Participant, Seeding};
use log::debug;
use sleeper_api::TeamStanding;

impl From<&TeamStanding> for Participant {
    fn from(team: &TeamStanding) -> Self {
        Self {
            id: team
                .user_id
                .clone()
                .unwrap_or_else(|| format!("roster-{}", team.roster_id)),
            roster_id: team.current_roster_id,
            name: team.name.clone(),
            weekly: team.weekly.clone(),
            placeholder: false,
        }
    }
}

/// Build the cup seeding from both divisions' ranked participants.
///
/// Inputs are already ordered best-first. Ranks the policy asks for that a
/// division can't supply are filled with named placeholders.
pub fn build_seeding(
    div1: &[Participant],
    div2: &[Participant],
    policy: &SeedingPolicy,
) -> Result<Seeding, CupError> {
    if div1.is_empty() {
        return Err(CupError::IncompleteStandings(Division::Premier));
    }
    if div2.is_empty() {
        return Err(CupError::IncompleteStandings(Division::Championship));
    }

    let mut seeding = Seeding::new();
    for band in &policy.bands {
        let ranked = match band.division {
            Division::Premier => div1,
            Division::Championship => div2,
        };
        for (offset, rank) in band.ranks.clone().enumerate() {
            let slot = u8::try_from(offset)
                .ok()
                .and_then(|o| band.first_slot.checked_add(o))
                .ok_or_else(|| CupError::InvalidSeeding(format!("{} rank {rank} has no slot", band.division)))?;

            let participant = match rank.checked_sub(1).and_then(|i| ranked.get(i)) {
                Some(p) => p.clone(),
                None => {
                    debug!("{} rank {rank} missing, seeding placeholder at {slot}", band.division);
                    Participant::placeholder(band.division, rank)
                }
            };

            if seeding.insert(slot, participant).is_some() {
                return Err(CupError::InvalidSeeding(format!("slot {slot} assigned twice")));
            }
        }
    }

    Ok(seeding)
}
