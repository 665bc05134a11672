//! Match (game), Side, and RoundType.

use crate::models::group::GroupId;
use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two team slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Group,
    Tiebreaker,
    Quarterfinal,
    Semifinal,
    Final,
}

impl RoundType {
    /// Bracket round the winner moves on to. `None` outside the bracket and after the final.
    pub fn next(self) -> Option<RoundType> {
        match self {
            RoundType::Quarterfinal => Some(RoundType::Semifinal),
            RoundType::Semifinal => Some(RoundType::Final),
            RoundType::Group | RoundType::Tiebreaker | RoundType::Final => None,
        }
    }

    pub fn is_knockout(self) -> bool {
        matches!(
            self,
            RoundType::Quarterfinal | RoundType::Semifinal | RoundType::Final
        )
    }
}

/// A single match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_a: Team,
    pub team_b: Team,
    /// None if not yet played. Always one of `team_a` / `team_b` by id.
    pub winner: Option<Team>,
    pub round: RoundType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub is_tiebreaker: bool,
    /// 1-based standings position the tiebreaker decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_breaker_position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_a: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_b: Option<u32>,
}

impl GameMatch {
    pub fn new(team_a: Team, team_b: Team, round: RoundType) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            winner: None,
            round,
            group_id: None,
            is_tiebreaker: false,
            tie_breaker_position: None,
            score_a: None,
            score_b: None,
        }
    }

    /// Round-robin fixture inside a group.
    pub fn group(team_a: Team, team_b: Team, group_id: &str) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            ..Self::new(team_a, team_b, RoundType::Group)
        }
    }

    /// Extra match deciding a standings tie.
    pub fn tiebreaker(team_a: Team, team_b: Team, group_id: &str, position: Option<u32>) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            is_tiebreaker: true,
            tie_breaker_position: position,
            ..Self::new(team_a, team_b, RoundType::Tiebreaker)
        }
    }

    /// Tiebreaker between teams of different groups contesting the last knockout places.
    /// Belongs to no group and never counts towards group standings.
    pub fn cross_group_tiebreaker(team_a: Team, team_b: Team, position: Option<u32>) -> Self {
        Self {
            is_tiebreaker: true,
            tie_breaker_position: position,
            ..Self::new(team_a, team_b, RoundType::Tiebreaker)
        }
    }

    /// Bracket match whose slots are both waiting on earlier rounds.
    pub fn pending(round: RoundType) -> Self {
        Self::new(Team::tbd(), Team::tbd(), round)
    }

    /// Which slot holds the given team, if any.
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if self.team_a.id == team_id {
            Some(Side::A)
        } else if self.team_b.id == team_id {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }

    pub fn is_played(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_bye(&self) -> bool {
        self.team_a.is_bye() || self.team_b.is_bye()
    }

    pub fn is_cross_group_tiebreaker(&self) -> bool {
        self.is_tiebreaker && self.group_id.is_none()
    }

    /// The side that wins a BYE match without being played. None unless exactly one slot is a BYE
    /// and the other holds a real team.
    pub fn bye_winner(&self) -> Option<&Team> {
        match (self.team_a.is_bye(), self.team_b.is_bye()) {
            (true, false) if !self.team_b.is_placeholder() => Some(&self.team_b),
            (false, true) if !self.team_a.is_placeholder() => Some(&self.team_a),
            _ => None,
        }
    }

    pub fn involves(&self, team_id: &TeamId) -> bool {
        self.side_of(team_id).is_some()
    }
}
