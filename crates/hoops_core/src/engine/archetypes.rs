//! Role-fit ratings derived from the attribute sheet.
//!
//! Archetypes drive actor selection (who takes the shot on a given play),
//! the fallback shot-zone model, and rebound/block/steal weighting.
//! All ratings are on a 0-100 scale.

use crate::models::{PlayType, Player, PlayerAttributes, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Archetypes {
    pub spacer: f64,
    pub driver: f64,
    pub post_scorer: f64,
    pub playmaker: f64,
    pub roll_man: f64,
    pub rim_protector: f64,
    pub perimeter_stopper: f64,
    pub pickpocket: f64,
    pub rebounder: f64,
}

/// Height bonus in rating points, centred on a 198 cm wing.
fn height_points(height_cm: u16) -> f64 {
    ((height_cm as f64 - 198.0) * 0.6).clamp(-12.0, 12.0)
}

impl Archetypes {
    pub fn derive(player: &Player) -> Self {
        Self::from_attributes(&player.attributes, player.position, player.height_cm)
    }

    pub fn from_attributes(a: &PlayerAttributes, position: Position, height_cm: u16) -> Self {
        let h = height_points(height_cm);
        let big = if position.is_big() { 6.0 } else { 0.0 };
        let r = |v: u8| v as f64;

        let raw = Self {
            spacer: r(a.three_point) * 0.7 + r(a.shot_iq) * 0.15 + r(a.offensive_consistency) * 0.15,
            driver: r(a.speed_with_ball) * 0.25
                + r(a.ball_handle) * 0.2
                + r(a.layup) * 0.25
                + r(a.dunk) * 0.1
                + r(a.agility) * 0.1
                + r(a.draw_foul) * 0.1,
            post_scorer: r(a.post_play) * 0.45 + r(a.close_shot) * 0.25 + r(a.strength) * 0.2 + h * 0.8,
            playmaker: r(a.pass_accuracy) * 0.3
                + r(a.pass_vision) * 0.3
                + r(a.pass_iq) * 0.2
                + r(a.ball_handle) * 0.2,
            roll_man: r(a.dunk) * 0.3
                + r(a.close_shot) * 0.25
                + r(a.vertical) * 0.2
                + r(a.strength) * 0.15
                + big
                + h * 0.5,
            rim_protector: r(a.block) * 0.45
                + r(a.interior_defense) * 0.3
                + r(a.vertical) * 0.1
                + big
                + h,
            perimeter_stopper: r(a.perimeter_defense) * 0.5
                + r(a.agility) * 0.2
                + r(a.speed) * 0.15
                + r(a.defensive_consistency) * 0.15,
            pickpocket: r(a.steal) * 0.6 + r(a.pass_perception) * 0.4,
            rebounder: (r(a.offensive_rebound) + r(a.defensive_rebound)) * 0.3
                + r(a.vertical) * 0.15
                + r(a.hustle) * 0.1
                + big
                + h,
        };
        raw.clamped()
    }

    fn clamped(self) -> Self {
        let c = |v: f64| v.clamp(0.0, 100.0);
        Self {
            spacer: c(self.spacer),
            driver: c(self.driver),
            post_scorer: c(self.post_scorer),
            playmaker: c(self.playmaker),
            roll_man: c(self.roll_man),
            rim_protector: c(self.rim_protector),
            perimeter_stopper: c(self.perimeter_stopper),
            pickpocket: c(self.pickpocket),
            rebounder: c(self.rebounder),
        }
    }

    /// How well this player finishes `play` as the primary actor.
    pub fn play_fit(&self, play: PlayType) -> f64 {
        match play {
            PlayType::Isolation => self.driver * 0.5 + self.spacer * 0.3 + self.playmaker * 0.2,
            PlayType::PnrHandler => self.playmaker * 0.6 + self.driver * 0.4,
            PlayType::PnrRoll => self.roll_man,
            PlayType::PnrPop => self.spacer * 0.7 + self.roll_man * 0.3,
            PlayType::PostUp => self.post_scorer,
            PlayType::CatchShoot => self.spacer,
            PlayType::Cut => self.driver * 0.6 + self.roll_man * 0.4,
            PlayType::Handoff => self.spacer * 0.5 + self.driver * 0.5,
            PlayType::Transition => self.driver * 0.7 + self.spacer * 0.3,
            PlayType::Putback => self.rebounder,
        }
    }

    /// Fit as the secondary actor: the screener on handler plays, the passer otherwise.
    pub fn support_fit(&self, play: PlayType) -> f64 {
        match play {
            PlayType::PnrHandler | PlayType::Handoff => self.roll_man,
            _ => self.playmaker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shooter_profile() {
        let mut attrs = PlayerAttributes::uniform(50);
        attrs.three_point = 95;
        attrs.shot_iq = 80;
        let shooter = Archetypes::from_attributes(&attrs, Position::SG, 193);
        let base = Archetypes::from_attributes(&PlayerAttributes::uniform(50), Position::SG, 193);
        assert!(shooter.spacer > base.spacer + 25.0);
        assert!(shooter.play_fit(PlayType::CatchShoot) > shooter.play_fit(PlayType::PostUp));
    }

    #[test]
    fn test_height_helps_bigs() {
        let attrs = PlayerAttributes::uniform(60);
        let center = Archetypes::from_attributes(&attrs, Position::C, 213);
        let guard = Archetypes::from_attributes(&attrs, Position::PG, 185);
        assert!(center.rim_protector > guard.rim_protector);
        assert!(center.rebounder > guard.rebounder);
        assert!((center.spacer - guard.spacer).abs() < 1e-9);
    }

    #[test]
    fn test_ratings_bounded() {
        let a = Archetypes::from_attributes(&PlayerAttributes::uniform(99), Position::C, 230);
        for v in [a.spacer, a.driver, a.post_scorer, a.rim_protector, a.rebounder, a.roll_man] {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
