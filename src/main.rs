// algoscope: step-recorded data structure visualization in the terminal

use std::fmt;
use std::time::{Duration, Instant};

use algoscope::player::{Player, PlayerState};
use algoscope::render::RenderAdapter;
use algoscope::structure::avl::AvlTree;
use algoscope::structure::binary_heap::MinHeap;
use algoscope::structure::bloom::BloomFilter;
use algoscope::structure::btree::BTree;
use algoscope::structure::disjoint_set::DisjointSet;
use algoscope::structure::fenwick::FenwickTree;
use algoscope::structure::order_statistic::OrderStatisticTree;
use algoscope::structure::red_black::RbTree;
use algoscope::structure::treap::Treap;
use algoscope::structure::trie::Trie;
use algoscope::trace::{Highlight, Step, StepResult, Trace};

/// Delay between auto-played steps
const STEP_INTERVAL: Duration = Duration::from_millis(400);

/// Fixed sizes for the bounded structures
const FENWICK_SLOTS: usize = 16;
const BLOOM_BITS: usize = 16;
const DSU_ELEMENTS: usize = 10;

/// Errors raised while validating command-line input
///
/// Invalid input never reaches an algorithm; it is rejected here.
#[derive(Debug)]
enum InputError {
    NotANumber(String),
    OutOfRange { value: usize, limit: usize },
    EmptyWord,
    MissingArgument(&'static str),
    UnknownStructure(String),
    UnknownOperation { structure: String, operation: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotANumber(s) => {
                write!(f, "'{}' is not a number", s)
            }
            InputError::OutOfRange { value, limit } => {
                write!(f, "element {} is out of range (0..{})", value, limit)
            }
            InputError::EmptyWord => {
                write!(f, "words must not be empty")
            }
            InputError::MissingArgument(what) => {
                write!(f, "missing argument: {}", what)
            }
            InputError::UnknownStructure(s) => {
                write!(f, "unknown structure '{}'", s)
            }
            InputError::UnknownOperation {
                structure,
                operation,
            } => {
                write!(f, "structure '{}' has no operation '{}'", structure, operation)
            }
        }
    }
}

impl std::error::Error for InputError {}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <structure> <operation> [values...]", program_name);
    eprintln!();
    eprintln!("Structures and operations:");
    eprintln!("  avl | rbtree | btree | treap   insert <keys...>");
    eprintln!("                                 search <key> [preload keys...]");
    eprintln!("  ost                            insert/search as above, plus");
    eprintln!("                                 select <k> [preload keys...]");
    eprintln!("                                 rank <key> [preload keys...]");
    eprintln!("  fenwick                        update <slot> <delta>  (slots 1..={})", FENWICK_SLOTS);
    eprintln!("                                 sum <slot> [slot delta preload pairs...]");
    eprintln!("  bloom                          insert <words...>  ({} bits)", BLOOM_BITS);
    eprintln!("                                 query <word> [preload words...]");
    eprintln!("  dsu                            union <a> <b>  ({} elements)", DSU_ELEMENTS);
    eprintln!("                                 find <x> [a b preload union pairs...]");
    eprintln!("                                 connected <a> <b> [a b preload union pairs...]");
    eprintln!("  heap                           push <keys...>");
    eprintln!("                                 pop [preload keys...]");
    eprintln!("  trie                           insert <words...>");
    eprintln!("                                 search <word> [preload words...]");
    eprintln!("                                 prefix <p> [preload words...]");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} avl insert 30 20 40 10", program_name);
    eprintln!("  {} bloom query cat cat dog", program_name);
    eprintln!("  {} dsu connected 0 2 0 1 1 2", program_name);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args
        .first()
        .map(|s| s.as_str())
        .unwrap_or("algoscope")
        .to_string();

    if args.len() < 3 {
        eprintln!("Error: No structure and operation provided");
        eprintln!();
        print_usage(&program_name);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage(&program_name);
        std::process::exit(1);
    }
}

// ========== Input validation helpers ==========

fn parse_key(s: &str) -> Result<i64, InputError> {
    s.parse::<i64>()
        .map_err(|_| InputError::NotANumber(s.to_string()))
}

fn parse_keys(args: &[String]) -> Result<Vec<i64>, InputError> {
    args.iter().map(|s| parse_key(s)).collect()
}

fn parse_element(s: &str, limit: usize) -> Result<usize, InputError> {
    let value = s
        .parse::<usize>()
        .map_err(|_| InputError::NotANumber(s.to_string()))?;
    if value >= limit {
        return Err(InputError::OutOfRange { value, limit });
    }
    Ok(value)
}

fn parse_word(s: &str) -> Result<&str, InputError> {
    if s.is_empty() {
        return Err(InputError::EmptyWord);
    }
    Ok(s)
}

fn require<'a>(args: &'a [String], index: usize, what: &'static str) -> Result<&'a str, InputError> {
    args.get(index)
        .map(|s| s.as_str())
        .ok_or(InputError::MissingArgument(what))
}

/// Parse trailing `a b` pairs used to preload union operations
fn parse_pairs(args: &[String], limit: usize) -> Result<Vec<(usize, usize)>, InputError> {
    let mut pairs = Vec::new();
    let mut it = args.iter();
    while let Some(a) = it.next() {
        let b = it.next().map(|s| s.as_str()).ok_or(InputError::MissingArgument(
            "preload pairs need two elements each",
        ))?;
        pairs.push((parse_element(a, limit)?, parse_element(b, limit)?));
    }
    Ok(pairs)
}

// ========== Dispatch ==========

fn run(args: &[String]) -> Result<(), InputError> {
    let structure = args[1].as_str();
    let operation = args[2].as_str();
    let rest = &args[3..];

    match structure {
        "avl" => {
            let mut tree = AvlTree::new();
            match operation {
                "insert" => {
                    let keys = parse_keys(rest)?;
                    if keys.is_empty() {
                        return Err(InputError::MissingArgument("at least one key"));
                    }
                    for key in keys {
                        play_trace(&format!("avl insert {key}"), tree.insert(key));
                    }
                }
                "search" => {
                    let key = parse_key(require(rest, 0, "key to search")?)?;
                    for preload in parse_keys(&rest[1..])? {
                        tree.insert(preload);
                    }
                    play_trace(&format!("avl search {key}"), tree.search(key));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "rbtree" => {
            let mut tree = RbTree::new();
            match operation {
                "insert" => {
                    let keys = parse_keys(rest)?;
                    if keys.is_empty() {
                        return Err(InputError::MissingArgument("at least one key"));
                    }
                    for key in keys {
                        play_trace(&format!("rbtree insert {key}"), tree.insert(key));
                    }
                }
                "search" => {
                    let key = parse_key(require(rest, 0, "key to search")?)?;
                    for preload in parse_keys(&rest[1..])? {
                        tree.insert(preload);
                    }
                    play_trace(&format!("rbtree search {key}"), tree.search(key));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "btree" => {
            let mut tree = BTree::new();
            match operation {
                "insert" => {
                    let keys = parse_keys(rest)?;
                    if keys.is_empty() {
                        return Err(InputError::MissingArgument("at least one key"));
                    }
                    for key in keys {
                        play_trace(&format!("btree insert {key}"), tree.insert(key));
                    }
                }
                "search" => {
                    let key = parse_key(require(rest, 0, "key to search")?)?;
                    for preload in parse_keys(&rest[1..])? {
                        tree.insert(preload);
                    }
                    play_trace(&format!("btree search {key}"), tree.search(key));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "treap" => {
            let mut treap = Treap::new();
            match operation {
                "insert" => {
                    let keys = parse_keys(rest)?;
                    if keys.is_empty() {
                        return Err(InputError::MissingArgument("at least one key"));
                    }
                    for key in keys {
                        play_trace(&format!("treap insert {key}"), treap.insert(key));
                    }
                }
                "search" => {
                    let key = parse_key(require(rest, 0, "key to search")?)?;
                    for preload in parse_keys(&rest[1..])? {
                        treap.insert(preload);
                    }
                    play_trace(&format!("treap search {key}"), treap.search(key));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "ost" => {
            let mut tree = OrderStatisticTree::new();
            match operation {
                "insert" => {
                    let keys = parse_keys(rest)?;
                    if keys.is_empty() {
                        return Err(InputError::MissingArgument("at least one key"));
                    }
                    for key in keys {
                        play_trace(&format!("ost insert {key}"), tree.insert(key));
                    }
                }
                "select" => {
                    let k = require(rest, 0, "rank to select")?
                        .parse::<usize>()
                        .map_err(|_| InputError::NotANumber(rest[0].clone()))?;
                    for preload in parse_keys(&rest[1..])? {
                        tree.insert(preload);
                    }
                    play_trace(&format!("ost select {k}"), tree.select(k));
                }
                "rank" => {
                    let key = parse_key(require(rest, 0, "key to rank")?)?;
                    for preload in parse_keys(&rest[1..])? {
                        tree.insert(preload);
                    }
                    play_trace(&format!("ost rank {key}"), tree.rank(key));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "fenwick" => {
            let mut fw = FenwickTree::new(FENWICK_SLOTS);
            match operation {
                "update" => {
                    let slot = parse_element(require(rest, 0, "slot")?, FENWICK_SLOTS + 1)?;
                    let delta = parse_key(require(rest, 1, "delta")?)?;
                    play_trace(&format!("fenwick update {slot} {delta}"), fw.update(slot, delta));
                }
                "sum" => {
                    let slot = parse_element(require(rest, 0, "slot")?, FENWICK_SLOTS + 1)?;
                    let mut it = rest[1..].chunks_exact(2);
                    for pair in &mut it {
                        let i = parse_element(&pair[0], FENWICK_SLOTS + 1)?;
                        let delta = parse_key(&pair[1])?;
                        fw.update(i, delta);
                    }
                    if !it.remainder().is_empty() {
                        return Err(InputError::MissingArgument(
                            "preload pairs need a slot and a delta each",
                        ));
                    }
                    play_trace(&format!("fenwick sum {slot}"), fw.prefix_sum(slot));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "bloom" => {
            let mut filter = BloomFilter::new(BLOOM_BITS);
            match operation {
                "insert" => {
                    if rest.is_empty() {
                        return Err(InputError::MissingArgument("at least one word"));
                    }
                    let words: Vec<&str> =
                        rest.iter().map(|w| parse_word(w)).collect::<Result<_, _>>()?;
                    for word in words {
                        play_trace(&format!("bloom insert \"{word}\""), filter.insert(word));
                    }
                }
                "query" => {
                    let word = parse_word(require(rest, 0, "word to query")?)?.to_string();
                    let preloads: Vec<&str> = rest[1..]
                        .iter()
                        .map(|w| parse_word(w))
                        .collect::<Result<_, _>>()?;
                    for preload in preloads {
                        filter.insert(preload);
                    }
                    play_trace(&format!("bloom query \"{word}\""), filter.query(&word));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "dsu" => {
            let mut dsu = DisjointSet::new(DSU_ELEMENTS);
            match operation {
                "union" => {
                    let a = parse_element(require(rest, 0, "first element")?, DSU_ELEMENTS)?;
                    let b = parse_element(require(rest, 1, "second element")?, DSU_ELEMENTS)?;
                    play_trace(&format!("dsu union {a} {b}"), dsu.union(a, b));
                }
                "find" => {
                    let x = parse_element(require(rest, 0, "element")?, DSU_ELEMENTS)?;
                    for (a, b) in parse_pairs(&rest[1..], DSU_ELEMENTS)? {
                        dsu.union(a, b);
                    }
                    play_trace(&format!("dsu find {x}"), dsu.find(x));
                }
                "connected" => {
                    let a = parse_element(require(rest, 0, "first element")?, DSU_ELEMENTS)?;
                    let b = parse_element(require(rest, 1, "second element")?, DSU_ELEMENTS)?;
                    for (x, y) in parse_pairs(&rest[2..], DSU_ELEMENTS)? {
                        dsu.union(x, y);
                    }
                    play_trace(&format!("dsu connected {a} {b}"), dsu.connected(a, b));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "heap" => {
            let mut heap = MinHeap::new();
            match operation {
                "push" => {
                    let keys = parse_keys(rest)?;
                    if keys.is_empty() {
                        return Err(InputError::MissingArgument("at least one key"));
                    }
                    for key in keys {
                        play_trace(&format!("heap push {key}"), heap.push(key));
                    }
                }
                "pop" => {
                    for preload in parse_keys(rest)? {
                        heap.push(preload);
                    }
                    play_trace("heap pop", heap.pop());
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        "trie" => {
            let mut trie = Trie::new();
            match operation {
                "insert" => {
                    if rest.is_empty() {
                        return Err(InputError::MissingArgument("at least one word"));
                    }
                    let words: Vec<&str> =
                        rest.iter().map(|w| parse_word(w)).collect::<Result<_, _>>()?;
                    for word in words {
                        play_trace(&format!("trie insert \"{word}\""), trie.insert(word));
                    }
                }
                "search" => {
                    let word = parse_word(require(rest, 0, "word to search")?)?.to_string();
                    let preloads: Vec<&str> = rest[1..]
                        .iter()
                        .map(|w| parse_word(w))
                        .collect::<Result<_, _>>()?;
                    for preload in preloads {
                        trie.insert(preload);
                    }
                    play_trace(&format!("trie search \"{word}\""), trie.search(&word));
                }
                "prefix" => {
                    let prefix = parse_word(require(rest, 0, "prefix")?)?.to_string();
                    let preloads: Vec<&str> = rest[1..]
                        .iter()
                        .map(|w| parse_word(w))
                        .collect::<Result<_, _>>()?;
                    for preload in preloads {
                        trie.insert(preload);
                    }
                    play_trace(&format!("trie prefix \"{prefix}\""), trie.starts_with(&prefix));
                }
                _ => return Err(unknown_op(structure, operation)),
            }
        }
        other => return Err(InputError::UnknownStructure(other.to_string())),
    }

    Ok(())
}

fn unknown_op(structure: &str, operation: &str) -> InputError {
    InputError::UnknownOperation {
        structure: structure.to_string(),
        operation: operation.to_string(),
    }
}

// ========== Playback ==========

/// Prints one line per step: counter, message, highlights, result
struct LinePrinter {
    shown: usize,
    total: usize,
}

impl LinePrinter {
    fn new(total: usize) -> Self {
        LinePrinter { shown: 0, total }
    }
}

impl<S> RenderAdapter<S> for LinePrinter {
    fn draw(&mut self, step: &Step<S>) {
        self.shown += 1;
        let mut line = format!("  [{}/{}] {}", self.shown, self.total, step.message);
        if !step.highlight.is_empty() {
            let mut parts: Vec<String> = step
                .highlight
                .iter()
                .map(|h| match h {
                    Highlight::Key(k) => k.to_string(),
                    Highlight::Index(i) => format!("#{i}"),
                    Highlight::Bit(b) => format!("bit {b}"),
                    Highlight::Text(t) => format!("\"{t}\""),
                })
                .collect();
            parts.sort();
            line.push_str(&format!("  ({})", parts.join(", ")));
        }
        if let Some(result) = step.result {
            let rendered = match result {
                StepResult::Found(b) => b.to_string(),
                StepResult::Value(v) => v.to_string(),
                StepResult::Index(i) => i.to_string(),
            };
            line.push_str(&format!("  => {}", rendered));
        }
        println!("{}", line);
    }
}

/// Replay one trace with timed auto-play, printing each step
fn play_trace<S>(label: &str, trace: Trace<S>) {
    let total = trace.len();
    println!("{label}:");

    let mut renderer = LinePrinter::new(total);
    let mut player: Player<S> = Player::new(STEP_INTERVAL);
    player.load_trace(trace);

    if let Some(step) = player.current() {
        renderer.draw(step);
    }

    player.play();
    let mut last_step_time = Instant::now();
    while player.state() == PlayerState::Playing {
        if last_step_time.elapsed() >= STEP_INTERVAL {
            if player.tick() {
                if let Some(step) = player.current() {
                    renderer.draw(step);
                }
            }
            last_step_time = Instant::now();
        } else {
            std::thread::sleep(Duration::from_millis(10));
        }
    }
    println!();
}
