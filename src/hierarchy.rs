//! Hierarchy builder (spec §4.10): turns the flat, overlap/metadata-annotated
//! chunk list into a forest by assigning stable ids and parent/child/sibling
//! links derived from `header_path`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::config::Config;
use crate::model::{Chunk, HierarchicalChunkingResult, Strategy};

const SYNTHETIC_ROOT_TITLE_FALLBACK: &str = "Document Summary";

pub fn build(
    mut chunks: Vec<Chunk>,
    config: &Config,
    strategy_used: Strategy,
    total_chars: usize,
    total_lines: usize,
) -> HierarchicalChunkingResult {
    assign_chunk_ids(&mut chunks);

    let root_id = if config.include_document_summary {
        Some(prepend_synthetic_root(&mut chunks))
    } else {
        None
    };

    link_family(&mut chunks, root_id.as_deref());
    assign_levels(&mut chunks, root_id.as_deref());

    HierarchicalChunkingResult {
        chunks,
        root_id,
        strategy_used,
        total_chars,
        total_lines,
    }
}

fn assign_chunk_ids(chunks: &mut [Chunk]) {
    for (index, chunk) in chunks.iter_mut().enumerate() {
        let mut hasher = DefaultHasher::new();
        index.hash(&mut hasher);
        chunk.start_line.hash(&mut hasher);
        chunk.end_line.hash(&mut hasher);
        chunk.content.hash(&mut hasher);
        let digest = hasher.finish();
        chunk.metadata.chunk_id = Some(format!("{:08x}", (digest & 0xFFFF_FFFF) as u32));
    }
}

fn prepend_synthetic_root(chunks: &mut Vec<Chunk>) -> String {
    let title = chunks
        .iter()
        .find_map(|c| c.metadata.header_path.clone())
        .and_then(|p| p.split('/').next_back().map(str::to_string))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| SYNTHETIC_ROOT_TITLE_FALLBACK.to_string());

    let mut root = Chunk::new(
        format!("# {title}"),
        chunks.first().map(|c| c.start_line).unwrap_or(1),
        chunks.first().map(|c| c.start_line).unwrap_or(1),
        Default::default(),
    );
    root.metadata.is_root = true;
    root.metadata.hierarchy_level = Some(0);

    let mut hasher = DefaultHasher::new();
    "__root__".hash(&mut hasher);
    root.content.hash(&mut hasher);
    let id = format!("{:08x}", (hasher.finish() & 0xFFFF_FFFF) as u32);
    root.metadata.chunk_id = Some(id.clone());

    chunks.insert(0, root);
    id
}

/// Link parent/children/sibling ids from `header_path` prefixes (spec §4.10
/// steps 3–5).
fn link_family(chunks: &mut [Chunk], root_id: Option<&str>) {
    let len = chunks.len();
    let ids: Vec<Option<String>> = chunks.iter().map(|c| c.metadata.chunk_id.clone()).collect();
    let paths: Vec<Option<String>> = chunks.iter().map(|c| c.metadata.header_path.clone()).collect();

    let mut parent_of: Vec<Option<usize>> = vec![None; len];
    for i in 0..len {
        if chunks[i].metadata.is_root {
            continue;
        }
        parent_of[i] = find_parent(&paths, i);
    }

    for i in 0..len {
        if chunks[i].metadata.is_root {
            continue;
        }
        let parent_id = match parent_of[i] {
            Some(j) => ids[j].clone(),
            None => root_id.map(str::to_string),
        };
        chunks[i].metadata.parent_id = parent_id;
    }

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); len];
    for i in 0..len {
        if let Some(j) = parent_of[i] {
            children_of[j].push(i);
        } else if chunks[i].metadata.parent_id.as_deref() == root_id {
            if let Some(root_idx) = chunks.iter().position(|c| c.metadata.is_root) {
                children_of[root_idx].push(i);
            }
        }
    }

    for (parent_idx, kids) in children_of.iter().enumerate() {
        chunks[parent_idx].metadata.children_ids = kids.iter().filter_map(|&k| ids[k].clone()).collect();
        for (pos, &kid) in kids.iter().enumerate() {
            let prev = if pos > 0 { ids[kids[pos - 1]].clone() } else { None };
            let next = if pos + 1 < kids.len() { ids[kids[pos + 1]].clone() } else { None };
            chunks[kid].metadata.prev_sibling_id = prev;
            chunks[kid].metadata.next_sibling_id = next;
        }
    }

    for chunk in chunks.iter_mut() {
        chunk.metadata.is_leaf = chunk.metadata.children_ids.is_empty();
    }
}

fn find_parent(paths: &[Option<String>], child_index: usize) -> Option<usize> {
    let child_path = paths[child_index].as_deref()?;
    let child_segments = path_segments(child_path);
    if child_segments.is_empty() {
        return None;
    }
    for j in (0..child_index).rev() {
        if let Some(candidate_path) = paths[j].as_deref() {
            let candidate_segments = path_segments(candidate_path);
            if candidate_segments.len() < child_segments.len()
                && candidate_segments.iter().zip(child_segments.iter()).all(|(a, b)| a == b)
            {
                return Some(j);
            }
        }
    }
    None
}

fn path_segments(path: &str) -> Vec<&str> {
    path.trim_start_matches('/').split('/').filter(|s| !s.is_empty()).collect()
}

fn assign_levels(chunks: &mut [Chunk], root_id: Option<&str>) {
    let id_to_index: std::collections::HashMap<String, usize> = chunks
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.metadata.chunk_id.clone().map(|id| (id, i)))
        .collect();

    for i in 0..chunks.len() {
        if chunks[i].metadata.is_root {
            chunks[i].metadata.hierarchy_level = Some(0);
            continue;
        }
        let mut level = if root_id.is_some() { 1 } else { 0 };
        let mut cursor = chunks[i].metadata.parent_id.clone();
        let mut guard = 0;
        while let Some(parent_id) = cursor {
            if Some(&parent_id) == root_id.map(String::from).as_ref() {
                break;
            }
            match id_to_index.get(&parent_id) {
                Some(&idx) => {
                    level += 1;
                    cursor = chunks[idx].metadata.parent_id.clone();
                }
                None => break,
            }
            guard += 1;
            if guard > chunks.len() {
                break;
            }
        }
        chunks[i].metadata.hierarchy_level = Some(level);
    }
}
