use automata_core::RabinAutomaton;
use tracing::debug;

use crate::error::SynthError;

/// Collapses every unobservable event in `g`'s alphabet to a single silent event (spec §4.3).
///
/// All transitions labelled by an unobservable event are relabelled onto one shared silent
/// event (registered via `EventSymbolTable::ensure_silent_event`, never by matching on the
/// event's name — spec §9 explicitly rules out the original's `name.find("eps")` heuristic).
/// Observable events pass through unchanged. The state space and acceptance condition are not
/// touched. If every event in `g`'s alphabet is already observable, `g` is returned unchanged
/// (modulo a fresh clone) and no silent event is introduced at all.
pub fn eps_observation(g: &RabinAutomaton) -> Result<RabinAutomaton, SynthError> {
    g.validate()?;

    let has_unobservable = g
        .alphabet()
        .any(|e| !g.events().get(e).map(|ev| ev.observable).unwrap_or(true));

    if !has_unobservable {
        let mut out = g.with_same_states(g.name().to_string());
        for e in g.alphabet() {
            let event = g.events().get(e).cloned().unwrap();
            let out_id = out.add_event(event);
            for (source, event_id, target) in g.transitions() {
                if event_id == e {
                    out.add_transition(source, out_id, target);
                }
            }
        }
        return Ok(out);
    }

    let mut out = g.with_same_states(format!("EpsObservation({})", g.name()));
    let silent = out.events_mut().ensure_silent_event("eps");
    out.ensure_event_in_alphabet(silent);

    for e in g.alphabet() {
        let event = g.events().get(e).cloned().unwrap();
        if !event.observable {
            continue;
        }
        out.add_event(event);
    }

    for (source, event, target) in g.transitions() {
        let observable = g
            .events()
            .get(event)
            .map(|ev| ev.observable)
            .unwrap_or(true);
        if observable {
            let name = g.events().name(event).unwrap();
            let out_id = out.events().id_by_name(name).unwrap();
            out.add_transition(source, out_id, target);
        } else {
            out.add_transition(source, silent, target);
        }
    }

    debug!(
        automaton = g.name(),
        silent_event = %silent,
        "collapsed unobservable events to a single silent event"
    );

    Ok(out)
}
