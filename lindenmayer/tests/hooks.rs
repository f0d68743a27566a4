use lindenmayer::{
    plain_symbols, EngineConfig, LSystem, LSystemError, Module, Production, Symbol,
};
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn plain(signature: char) -> Symbol {
    Symbol::plain(signature)
}

fn param(signature: char, value: f64) -> Symbol {
    Symbol::parametric(signature, [value])
}

#[test]
fn test_goal_hook_edits_each_match_in_order() {
    let mut system = LSystem::new();
    // A -> B(10)
    system.add_production(Production::new(plain('A'), vec![param('B', 10.0)]));

    let goal_state = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&goal_state);
    system.set_goal_hook(move |_state, _position, successor| {
        let value = 21.0 + counter.get() as f64;
        successor[0].set_param(0, value);
        counter.set(counter.get() + 1);
    });

    system.set_axiom(&plain_symbols("AAA"));
    system.step().unwrap();

    assert_eq!(goal_state.get(), 3);
    assert_eq!(
        system.state(),
        &[param('B', 21.0), param('B', 22.0), param('B', 23.0)]
    );
}

#[test]
fn test_goal_hook_positions_follow_spliced_sequence() {
    let mut system = LSystem::new();
    // A -> AB
    system.add_production(Production::new(plain('A'), plain_symbols("AB")));

    let positions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&positions);
    system.set_goal_hook(move |state, position, _successor| {
        assert_eq!(state.get(position), Some(&plain('A')));
        sink.borrow_mut().push(position);
    });

    system.set_axiom(&plain_symbols("AXA"));
    system.step().unwrap();

    // The second A sits at index 3 once the first one has grown to AB.
    assert_eq!(*positions.borrow(), vec![0, 3]);
    assert_eq!(system.to_string(), "ABXAB");
}

#[test]
fn test_goal_hook_is_skipped_for_unmatched_symbols() {
    let mut system = LSystem::new();
    system.add_production(Production::new(plain('A'), plain_symbols("B")));

    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    system.set_goal_hook(move |_, _, _| counter.set(counter.get() + 1));

    system.set_axiom(&plain_symbols("XYZA"));
    system.step().unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_constraint_hook_runs_after_goal_hook() {
    let mut system = LSystem::new();
    // F -> F(1)
    system.add_production(Production::new(plain('F'), vec![param('F', 1.0)]));

    let order = Rc::new(RefCell::new(Vec::new()));

    let goal_order = Rc::clone(&order);
    system.set_goal_hook(move |_, _, successor| {
        goal_order.borrow_mut().push("goal");
        successor[0].set_param(0, 100.0);
    });

    let constraint_order = Rc::clone(&order);
    system.set_constraint_hook(move |_, _, successor| {
        constraint_order.borrow_mut().push("constraint");
        // The goal hook's edit is visible here; clamp it.
        for module in successor.iter_mut() {
            if let Some(length) = module.param(0) {
                module.set_param(0, length.min(50.0));
            }
        }
    });

    system.set_axiom(&plain_symbols("FF"));
    system.step().unwrap();

    assert_eq!(
        *order.borrow(),
        vec!["goal", "constraint", "goal", "constraint"]
    );
    assert_eq!(system.state(), &[param('F', 50.0), param('F', 50.0)]);
}

#[test]
fn test_hooks_may_resize_successor() {
    let mut system = LSystem::new();
    // A -> AA
    system.add_production(Production::new(plain('A'), plain_symbols("AA")));
    // Constraint: never grow past 4 symbols in total.
    system.set_constraint_hook(|state, position, successor| {
        let remaining = state.len() - position - 1;
        let budget = 4usize.saturating_sub(position + remaining);
        successor.truncate(budget.max(1));
    });

    system.set_axiom(&plain_symbols("A"));
    system.step_n(5).unwrap();
    assert_eq!(system.to_string(), "AAAA");
}

#[test]
fn test_tracking_hook_accumulates_position() {
    let mut system = LSystem::new();
    // B(5) -> B(5)F(10)
    system.add_production(Production::new(
        param('B', 5.0),
        vec![param('B', 5.0), param('F', 10.0)],
    ));

    let tracked = Rc::new(Cell::new(0.0f64));
    let position = Rc::clone(&tracked);
    system.set_track_hook(move |module: &Symbol| {
        let Some(value) = module.param(0) else {
            return;
        };
        match module.signature() {
            'F' => position.set(position.get() + value),
            'B' => position.set(position.get() - value),
            _ => {}
        }
    });

    system.set_axiom(&[param('B', 5.0), param('B', 5.0), param('B', 5.0)]);
    system.step().unwrap();

    assert_eq!(tracked.get(), 15.0);
}

#[test]
fn test_tracking_hook_sees_every_symbol_in_order() {
    let mut system = LSystem::new();
    system.add_production(Production::new(plain('A'), plain_symbols("AB")));
    system.add_production(Production::new(plain('D'), vec![]));

    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    system.set_track_hook(move |module: &Symbol| sink.borrow_mut().push(module.signature()));

    system.set_axiom(&plain_symbols("AXDA"));
    system.step().unwrap();

    assert_eq!(*seen.borrow(), "ABXAB");
    assert_eq!(seen.borrow().len(), system.len());
}

#[test]
fn test_symbol_limit_stops_hooks_at_failing_position() {
    let mut system = LSystem::with_config(EngineConfig::default().with_max_symbols(4));
    system.add_production(Production::new(plain('A'), plain_symbols("AA")));

    let tracked = Rc::new(Cell::new(0usize));
    let track_count = Rc::clone(&tracked);
    system.set_track_hook(move |_: &Symbol| track_count.set(track_count.get() + 1));

    let goal_calls = Rc::new(Cell::new(0usize));
    let goal_count = Rc::clone(&goal_calls);
    system.set_goal_hook(move |_, _, _| goal_count.set(goal_count.get() + 1));

    system.set_axiom(&plain_symbols("AAA"));
    let result = system.step();

    assert!(matches!(
        result,
        Err(LSystemError::SymbolLimitExceeded { limit: 4, attempted: 6 })
    ));
    assert_eq!(system.to_string(), "AAA");
    assert_eq!(system.generation(), 0);
    assert_eq!(tracked.get(), 4);
    assert_eq!(goal_calls.get(), 3);
}

#[test]
fn test_successor_edits_do_not_leak_into_template() {
    let template = param('A', 10.0);
    let mut system = LSystem::new();
    // B -> A(10)
    system.add_production(Production::new(plain('B'), vec![template.clone()]));

    let first = Rc::new(Cell::new(true));
    let flag = Rc::clone(&first);
    system.set_goal_hook(move |_, _, successor| {
        if flag.get() {
            successor[0].set_param(0, 15.0);
            flag.set(false);
        }
    });

    system.set_axiom(&plain_symbols("BBB"));
    system.step().unwrap();

    assert_eq!(
        system.state(),
        &[param('A', 15.0), param('A', 10.0), param('A', 10.0)]
    );
    assert_eq!(system.productions()[0].resolve_successor(&mut rand::thread_rng()), &[template]);
}

#[test]
fn test_generated_state_is_independent_of_caller_modules() {
    let mut a10 = param('A', 10.0);
    let mut system = LSystem::new();
    system.add_production(Production::new(plain('B'), vec![a10.clone()]));
    system.set_axiom(&plain_symbols("BBB"));
    system.step().unwrap();

    let expected = vec![param('A', 10.0); 3];
    assert_eq!(system.state(), expected.as_slice());

    a10.set_param(0, 15.0);
    assert_eq!(system.state(), expected.as_slice());
}

#[test]
fn test_clear_hooks() {
    let mut system = LSystem::new();
    system.add_production(Production::new(plain('A'), plain_symbols("B")));

    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    system.set_track_hook(move |_: &Symbol| counter.set(counter.get() + 1));
    system.set_axiom(&plain_symbols("AA"));
    system.step().unwrap();
    assert_eq!(calls.get(), 2);

    system.clear_hooks();
    system.step().unwrap();
    assert_eq!(calls.get(), 2);
}
