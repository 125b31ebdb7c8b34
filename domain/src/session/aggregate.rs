//! The triage session aggregate.

use super::outcome::{AcceptOutcome, AcceptTransition, AdvanceOutcome, JoinOutcome, SessionPhase};
use crate::core::error::TriageError;
use crate::core::identifiers::{IssueId, Nick};
use crate::proposal::{Proposal, ProposalLedger, Resolution};
use crate::queue::{IssueQueue, build_candidates};
use crate::quorum::QuorumGate;
use std::collections::{BTreeSet, HashMap, HashSet};

/// In-memory state of one triage meeting.
///
/// Invariants:
/// - the issue under discussion is never in the seen set
/// - the seen set only grows until the session is reset
/// - a live proposal always belongs to the issue it was made for; moving to
///   another issue drops it
///
/// Every fallible transition validates first and mutates afterwards, so an
/// `Err` leaves the session exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct TriageSession {
    phase: SessionPhase,
    triagers: BTreeSet<Nick>,
    chairs: BTreeSet<Nick>,
    current_issue: Option<IssueId>,
    seen: HashSet<IssueId>,
    deferred: HashSet<IssueId>,
    carers: HashMap<IssueId, BTreeSet<Nick>>,
    proposal: ProposalLedger,
    queue: Option<IssueQueue>,
}

impl TriageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and return to the process-start state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Begin a meeting. Prior state is discarded, never merged.
    pub fn start(&mut self, initiator: Nick) {
        self.reset();
        self.phase = SessionPhase::Active;
        self.chairs.insert(initiator.clone());
        self.triagers.insert(initiator);
    }

    /// Close the meeting.
    pub fn end(&mut self) {
        self.reset();
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    // ==================== Participants ====================

    pub fn join(&mut self, nick: Nick) -> JoinOutcome {
        if self.triagers.insert(nick) {
            JoinOutcome::Joined
        } else {
            JoinOutcome::AlreadyJoined
        }
    }

    pub fn is_triager(&self, nick: &Nick) -> bool {
        self.triagers.contains(nick)
    }

    pub fn is_chair(&self, nick: &Nick) -> bool {
        self.chairs.contains(nick)
    }

    pub fn triager_count(&self) -> usize {
        self.triagers.len()
    }

    pub fn ensure_chair(&self, nick: &Nick) -> Result<(), TriageError> {
        if self.is_chair(nick) {
            Ok(())
        } else {
            Err(TriageError::NotChair(nick.clone()))
        }
    }

    /// Only an existing chair may appoint another chair (or re-appoint
    /// themselves when `target` is `None`). Returns the appointed nick.
    pub fn add_chair(&mut self, requester: &Nick, target: Option<Nick>) -> Result<Nick, TriageError> {
        self.ensure_chair(requester)?;
        let chair = target.unwrap_or_else(|| requester.clone());
        self.chairs.insert(chair.clone());
        Ok(chair)
    }

    // ==================== Queue ====================

    pub fn ensure_quorum(&self, gate: QuorumGate) -> Result<(), TriageError> {
        let present = self.triagers.len();
        if gate.is_met(present) {
            Ok(())
        } else {
            Err(TriageError::NoQuorum {
                present,
                required: gate.required(),
            })
        }
    }

    /// Replace the cached tracker snapshot.
    pub fn refresh_queue(&mut self, queue: IssueQueue) {
        self.queue = Some(queue);
    }

    /// Last tracker snapshot, if one was fetched this session.
    pub fn queue(&self) -> Option<&IssueQueue> {
        self.queue.as_ref()
    }

    /// Move past the current issue, marking it seen.
    ///
    /// `queue` is the freshly fetched tracker list; it replaces the cached
    /// snapshot. Candidates are computed before the current issue is retired,
    /// with the current issue excluded, so it can never be its own successor.
    pub fn advance(
        &mut self,
        gate: QuorumGate,
        queue: IssueQueue,
    ) -> Result<AdvanceOutcome, TriageError> {
        self.ensure_quorum(gate)?;
        Ok(self.step(queue, Retire::Seen))
    }

    /// Defer the current issue (if any) and move on.
    ///
    /// The deferred issue is not marked seen; it comes back once every
    /// non-deferred issue has been handled.
    pub fn defer(
        &mut self,
        gate: QuorumGate,
        queue: IssueQueue,
    ) -> Result<AdvanceOutcome, TriageError> {
        self.ensure_quorum(gate)?;
        Ok(self.step(queue, Retire::Deferred))
    }

    fn step(&mut self, queue: IssueQueue, retire: Retire) -> AdvanceOutcome {
        let candidates = build_candidates(&queue, &self.seen, &self.deferred, self.current_issue);
        self.queue = Some(queue);

        if let Some(previous) = self.current_issue.take() {
            match retire {
                Retire::Seen => self.seen.insert(previous),
                Retire::Deferred => self.deferred.insert(previous),
            };
            self.proposal.clear();
        }

        match candidates.first() {
            Some(&issue) => {
                self.set_current(issue);
                AdvanceOutcome::Advanced {
                    issue,
                    remaining: candidates.len(),
                }
            }
            None => AdvanceOutcome::QueueExhausted,
        }
    }

    /// Jump straight to `issue`, abandoning the current one without marking
    /// it seen.
    /// Validate that `issue` can be selected directly. Never mutates.
    pub fn check_select(&self, issue: IssueId) -> Result<(), TriageError> {
        if self.seen.contains(&issue) {
            return Err(TriageError::AlreadySeen(issue));
        }
        Ok(())
    }

    pub fn select_issue(&mut self, issue: IssueId) -> Result<(), TriageError> {
        self.check_select(issue)?;
        self.set_current(issue);
        Ok(())
    }

    fn set_current(&mut self, issue: IssueId) {
        if self.current_issue != Some(issue) {
            self.proposal.clear();
        }
        self.current_issue = Some(issue);
    }

    pub fn current_issue(&self) -> Option<IssueId> {
        self.current_issue
    }

    pub fn seen(&self) -> &HashSet<IssueId> {
        &self.seen
    }

    pub fn deferred(&self) -> &HashSet<IssueId> {
        &self.deferred
    }

    /// Tracker ids not yet seen this session, in tracker order.
    pub fn untriaged(&self, tracker_list: &IssueQueue) -> Vec<IssueId> {
        tracker_list
            .ids()
            .iter()
            .copied()
            .filter(|id| !self.seen.contains(id))
            .collect()
    }

    // ==================== Proposals ====================

    /// Record a proposal, replacing any live one.
    pub fn propose(&mut self, proposal: Proposal) -> &Proposal {
        self.proposal.set(proposal)
    }

    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.current()
    }

    /// Validate that the live proposal can be accepted right now and report
    /// which transition it would trigger. Never mutates.
    pub fn check_accept(&self, gate: QuorumGate) -> Result<Resolution, TriageError> {
        let proposal = self.proposal.current().ok_or(TriageError::NoProposal)?;
        if self.current_issue.is_none() {
            return Err(TriageError::NoCurrentIssue);
        }
        let resolution = proposal.kind.resolution();
        if resolution != Resolution::Record {
            self.ensure_quorum(gate)?;
        }
        Ok(resolution)
    }

    /// Accept the live proposal and apply its transition.
    ///
    /// `queue` should be a fresh tracker list; when `None`, the cached
    /// snapshot is reused.
    pub fn accept(
        &mut self,
        gate: QuorumGate,
        queue: Option<IssueQueue>,
    ) -> Result<AcceptOutcome, TriageError> {
        let resolution = self.check_accept(gate)?;
        let proposal = self
            .proposal
            .take_if_present()
            .ok_or(TriageError::NoProposal)?;

        let transition = match resolution {
            Resolution::Advance => {
                let queue = queue.unwrap_or_else(|| self.cached_queue());
                AcceptTransition::Advanced(self.step(queue, Retire::Seen))
            }
            Resolution::Defer => {
                let queue = queue.unwrap_or_else(|| self.cached_queue());
                AcceptTransition::Deferred(self.step(queue, Retire::Deferred))
            }
            Resolution::Record => AcceptTransition::Recorded,
        };

        Ok(AcceptOutcome {
            proposal,
            transition,
        })
    }

    fn cached_queue(&self) -> IssueQueue {
        self.queue.clone().unwrap_or_default()
    }

    // ==================== Carers ====================

    /// Register `nick` as caring about each id present in the last fetched
    /// queue. Unknown ids are ignored. Returns the ids that were accepted.
    pub fn express_care(&mut self, nick: &Nick, ids: &[IssueId]) -> Vec<IssueId> {
        let Some(queue) = self.queue.as_ref() else {
            return Vec::new();
        };

        let accepted: Vec<IssueId> = ids.iter().copied().filter(|id| queue.contains(*id)).collect();
        for id in &accepted {
            self.carers.entry(*id).or_default().insert(nick.clone());
        }
        accepted
    }

    /// Nicks caring about `issue`, sorted.
    pub fn carers(&self, issue: IssueId) -> Vec<&Nick> {
        self.carers
            .get(&issue)
            .map(|nicks| nicks.iter().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
enum Retire {
    Seen,
    Deferred,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::{Priority, ProposalKind, Severity};

    fn queue(raw: &[u64]) -> IssueQueue {
        raw.iter().copied().map(IssueId::new).collect()
    }

    fn id(raw: u64) -> IssueId {
        IssueId::new(raw)
    }

    fn quorum_of_two() -> QuorumGate {
        QuorumGate::new(2)
    }

    /// Session with two triagers and `alice` as chair.
    fn started() -> TriageSession {
        let mut session = TriageSession::new();
        session.start(Nick::new("alice"));
        session.join(Nick::new("bob"));
        session
    }

    #[test]
    fn test_no_quorum_then_advance() {
        let mut session = TriageSession::new();
        let result = session.advance(quorum_of_two(), queue(&[10, 11, 12]));
        assert_eq!(
            result,
            Err(TriageError::NoQuorum {
                present: 0,
                required: 2
            })
        );
        assert_eq!(session.current_issue(), None);
        assert!(session.queue().is_none());

        assert_eq!(session.join(Nick::new("alice")), JoinOutcome::Joined);
        assert_eq!(session.join(Nick::new("bob")), JoinOutcome::Joined);

        let outcome = session
            .advance(quorum_of_two(), queue(&[10, 11, 12]))
            .unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                issue: id(10),
                remaining: 3
            }
        );
        assert_eq!(session.current_issue(), Some(id(10)));
    }

    #[test]
    fn test_no_quorum_never_mutates() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2, 3])).unwrap();
        session.defer(quorum_of_two(), queue(&[1, 2, 3])).unwrap();
        let seen = session.seen().clone();
        let deferred = session.deferred().clone();

        let strict = QuorumGate::new(3);
        assert!(session.advance(strict, queue(&[1, 2, 3])).is_err());
        assert!(session.defer(strict, queue(&[1, 2, 3])).is_err());

        assert_eq!(session.current_issue(), Some(id(2)));
        assert_eq!(session.seen(), &seen);
        assert_eq!(session.deferred(), &deferred);
    }

    #[test]
    fn test_join_twice() {
        let mut session = TriageSession::new();
        assert_eq!(session.join(Nick::new("carol")), JoinOutcome::Joined);
        assert_eq!(session.join(Nick::new("carol")), JoinOutcome::AlreadyJoined);
        assert_eq!(session.triager_count(), 1);
    }

    #[test]
    fn test_start_resets_and_seats_initiator() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();

        session.start(Nick::new("dave"));
        assert!(session.is_active());
        assert!(session.is_chair(&Nick::new("dave")));
        assert!(session.is_triager(&Nick::new("dave")));
        assert!(!session.is_triager(&Nick::new("alice")));
        assert!(session.seen().is_empty());
        assert_eq!(session.current_issue(), None);
    }

    #[test]
    fn test_end_resets_to_not_started() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1])).unwrap();
        session.end();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.triager_count(), 0);
        assert_eq!(session.current_issue(), None);
        assert!(session.queue().is_none());
    }

    #[test]
    fn test_seen_only_grows() {
        let mut session = started();
        let mut previous = 0;
        for _ in 0..5 {
            session.advance(quorum_of_two(), queue(&[1, 2, 3])).unwrap();
            assert!(session.seen().len() >= previous);
            previous = session.seen().len();
        }
        assert_eq!(previous, 3);
        assert_eq!(session.current_issue(), None);
    }

    #[test]
    fn test_defer_scenario() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[10, 11, 12])).unwrap();
        assert_eq!(session.current_issue(), Some(id(10)));

        let outcome = session.defer(quorum_of_two(), queue(&[10, 11, 12])).unwrap();
        assert_eq!(outcome.issue(), Some(id(11)));
        assert!(session.deferred().contains(&id(10)));
        assert!(!session.seen().contains(&id(10)));
        assert_eq!(session.current_issue(), Some(id(11)));
    }

    #[test]
    fn test_deferred_issue_returns_after_primary_exhausted() {
        let mut session = started();
        let raw = [10, 11, 12];
        session.advance(quorum_of_two(), queue(&raw)).unwrap();
        session.defer(quorum_of_two(), queue(&raw)).unwrap(); // 10 deferred, 11 current

        let outcome = session.advance(quorum_of_two(), queue(&raw)).unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                issue: id(12),
                remaining: 2
            }
        );

        let outcome = session.advance(quorum_of_two(), queue(&raw)).unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                issue: id(10),
                remaining: 1
            }
        );

        let outcome = session.advance(quorum_of_two(), queue(&raw)).unwrap();
        assert_eq!(outcome, AdvanceOutcome::QueueExhausted);
        assert!(session.seen().contains(&id(10)));
    }

    #[test]
    fn test_defer_without_current_just_advances() {
        let mut session = started();
        let outcome = session.defer(quorum_of_two(), queue(&[4, 5])).unwrap();
        assert_eq!(outcome.issue(), Some(id(4)));
        assert!(session.deferred().is_empty());
    }

    #[test]
    fn test_queue_exhausted() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[10, 11])).unwrap();
        session.advance(quorum_of_two(), queue(&[10, 11])).unwrap();

        let outcome = session.advance(quorum_of_two(), queue(&[10, 11])).unwrap();
        assert_eq!(outcome, AdvanceOutcome::QueueExhausted);
        assert!(session.seen().contains(&id(10)));
        assert!(session.seen().contains(&id(11)));
        assert_eq!(session.current_issue(), None);

        let again = session.advance(quorum_of_two(), queue(&[10, 11])).unwrap();
        assert_eq!(again, AdvanceOutcome::QueueExhausted);
    }

    #[test]
    fn test_current_not_its_own_successor() {
        let mut session = started();
        session.select_issue(id(11)).unwrap();

        let outcome = session.advance(quorum_of_two(), queue(&[11])).unwrap();
        assert_eq!(outcome, AdvanceOutcome::QueueExhausted);
        assert!(session.seen().contains(&id(11)));
    }

    #[test]
    fn test_tracker_changes_between_advances() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        let outcome = session.advance(quorum_of_two(), queue(&[3, 1, 2])).unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                issue: id(3),
                remaining: 2
            }
        );
        assert_eq!(session.queue(), Some(&queue(&[3, 1, 2])));
    }

    #[test]
    fn test_propose_overwrites() {
        let mut session = started();
        session.propose(Proposal::skip());
        session.propose(Proposal::triage(Priority::High, Severity::Low, None));

        let live = session.proposal().unwrap();
        assert_eq!(live.kind, ProposalKind::Triage);
        assert_eq!(live.description, "Priority: high, Severity low");
    }

    #[test]
    fn test_accept_without_proposal() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        assert_eq!(
            session.accept(quorum_of_two(), Some(queue(&[1, 2]))),
            Err(TriageError::NoProposal)
        );
        assert_eq!(session.current_issue(), Some(id(1)));
        assert!(session.seen().is_empty());
    }

    #[test]
    fn test_accept_advances_and_marks_seen() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[10, 11])).unwrap();
        session.propose(Proposal::accept());

        let outcome = session
            .accept(quorum_of_two(), Some(queue(&[10, 11])))
            .unwrap();
        assert_eq!(outcome.proposal, Proposal::accept());
        assert_eq!(
            outcome.transition,
            AcceptTransition::Advanced(AdvanceOutcome::Advanced {
                issue: id(11),
                remaining: 1
            })
        );
        assert!(session.proposal().is_none());
        assert!(session.seen().contains(&id(10)));
        assert!(session.deferred().is_empty());
    }

    #[test]
    fn test_accept_triage_and_skip_route_to_advance() {
        for proposal in [
            Proposal::triage(Priority::Normal, Severity::Medium, Some("3.0")),
            Proposal::skip(),
        ] {
            let mut session = started();
            session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
            session.propose(proposal);
            let outcome = session.accept(quorum_of_two(), Some(queue(&[1, 2]))).unwrap();
            assert!(matches!(outcome.transition, AcceptTransition::Advanced(_)));
            assert!(session.seen().contains(&id(1)));
            assert!(session.deferred().is_empty());
        }
    }

    #[test]
    fn test_accept_defer_routes_to_defer() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.propose(Proposal::defer());

        let outcome = session.accept(quorum_of_two(), Some(queue(&[1, 2]))).unwrap();
        assert!(matches!(outcome.transition, AcceptTransition::Deferred(_)));
        assert!(session.deferred().contains(&id(1)));
        assert!(!session.seen().contains(&id(1)));
        assert_eq!(session.current_issue(), Some(id(2)));
    }

    #[test]
    fn test_accept_needinfo_only_records() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.propose(Proposal::need_info());

        let outcome = session.accept(QuorumGate::new(10), None).unwrap();
        assert_eq!(outcome.transition, AcceptTransition::Recorded);
        assert_eq!(session.current_issue(), Some(id(1)));
        assert!(session.proposal().is_none());
    }

    #[test]
    fn test_accept_without_current_issue_keeps_proposal() {
        let mut session = started();
        session.propose(Proposal::skip());
        assert_eq!(
            session.accept(quorum_of_two(), None),
            Err(TriageError::NoCurrentIssue)
        );
        assert!(session.proposal().is_some());
    }

    #[test]
    fn test_accept_without_quorum_keeps_proposal() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.propose(Proposal::accept());

        let result = session.accept(QuorumGate::new(5), Some(queue(&[1, 2])));
        assert!(matches!(result, Err(TriageError::NoQuorum { .. })));
        assert!(session.proposal().is_some());
        assert_eq!(session.current_issue(), Some(id(1)));
    }

    #[test]
    fn test_accept_falls_back_to_cached_queue() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.propose(Proposal::skip());

        let outcome = session.accept(quorum_of_two(), None).unwrap();
        assert_eq!(
            outcome.transition,
            AcceptTransition::Advanced(AdvanceOutcome::Advanced {
                issue: id(2),
                remaining: 1
            })
        );
    }

    #[test]
    fn test_moving_on_drops_stale_proposal() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.propose(Proposal::skip());
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        assert!(session.proposal().is_none());
    }

    #[test]
    fn test_express_care_only_for_queued_ids() {
        let mut session = started();
        let carol = Nick::new("carol");

        assert!(session.express_care(&carol, &[id(10)]).is_empty());

        session.refresh_queue(queue(&[10, 11]));
        let accepted = session.express_care(&carol, &[id(10), id(99)]);
        assert_eq!(accepted, vec![id(10)]);
        assert_eq!(session.carers(id(10)), vec![&carol]);
        assert!(session.carers(id(99)).is_empty());
    }

    #[test]
    fn test_express_care_unknown_id_is_noop() {
        let mut session = started();
        session.refresh_queue(queue(&[10]));
        session.express_care(&Nick::new("bob"), &[id(10)]);
        let before = session.carers(id(10)).len();

        session.express_care(&Nick::new("carol"), &[id(42)]);
        assert_eq!(session.carers(id(10)).len(), before);
        assert!(session.carers(id(42)).is_empty());
    }

    #[test]
    fn test_carers_sorted() {
        let mut session = started();
        session.refresh_queue(queue(&[7]));
        session.express_care(&Nick::new("zed"), &[id(7)]);
        session.express_care(&Nick::new("amy"), &[id(7)]);
        session.express_care(&Nick::new("amy"), &[id(7)]);

        let names: Vec<&str> = session.carers(id(7)).iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }

    #[test]
    fn test_select_issue() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        session.select_issue(id(50)).unwrap();
        assert_eq!(session.current_issue(), Some(id(50)));
        // abandoned, not seen
        assert!(!session.seen().contains(&id(1)));

        session.advance(quorum_of_two(), queue(&[1, 2])).unwrap();
        assert_eq!(
            session.check_select(id(50)),
            Err(TriageError::AlreadySeen(id(50)))
        );
        assert_eq!(
            session.select_issue(id(50)),
            Err(TriageError::AlreadySeen(id(50)))
        );
        assert!(session.check_select(id(2)).is_ok());
    }

    #[test]
    fn test_untriaged_filters_seen() {
        let mut session = started();
        session.advance(quorum_of_two(), queue(&[3, 4, 5])).unwrap();
        session.advance(quorum_of_two(), queue(&[3, 4, 5])).unwrap();
        assert_eq!(
            session.untriaged(&queue(&[5, 4, 3])),
            vec![id(5), id(4)]
        );
    }

    #[test]
    fn test_add_chair_requires_chair() {
        let mut session = started();
        let alice = Nick::new("alice");
        let bob = Nick::new("bob");

        assert_eq!(
            session.add_chair(&bob, None),
            Err(TriageError::NotChair(bob.clone()))
        );
        assert!(!session.is_chair(&bob));

        assert_eq!(session.add_chair(&alice, Some(bob.clone())), Ok(bob.clone()));
        assert!(session.is_chair(&bob));
        assert_eq!(session.add_chair(&bob, None), Ok(bob.clone()));
    }
}
