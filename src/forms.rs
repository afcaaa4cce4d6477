use hashbrown::HashMap;
use hashbrown::hash_map::RawEntryMut;
use rustc_hash::{FxBuildHasher, FxHasher};
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;

pub const FORM_TABLE_CAPACITY: usize = 5000;

/// Id of an interned form
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct FormId(NonZeroU32); // 0 reserved as "invalid"

impl FormId {
    #[inline]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Append-only interning table for word forms.
///
/// All strings live in one growing slab; an id is a `(offset, len)` span into
/// it. The hash map stores ids only and compares candidates against the slab,
/// so a lookup by `&str` never allocates and ids survive slab growth.
#[derive(Debug, Clone)]
pub struct FormTable {
    map: HashMap<FormId, (), FxBuildHasher>,
    slab: String,
    spans: Vec<(u32, u32)>, // index = FormId-1
    max_len: usize,
}

impl Default for FormTable {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn hash_form(form: &str) -> u64 {
    let mut h = FxHasher::default();
    form.hash(&mut h);
    h.finish()
}

#[inline]
fn span_str<'a>(slab: &'a str, spans: &[(u32, u32)], id: FormId) -> &'a str {
    let (off, len) = spans[id.index()];
    &slab[off as usize..(off + len) as usize]
}

impl FormTable {
    pub fn new() -> Self {
        Self::with_capacity(FORM_TABLE_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(cap, FxBuildHasher),
            slab: String::with_capacity(cap * 8),
            spans: Vec::with_capacity(cap),
            max_len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Length in chars of the longest interned form
    #[inline]
    pub fn max_form_len(&self) -> usize {
        self.max_len
    }

    /// Id of `form`, interning it on first sight
    pub fn intern(&mut self, form: &str) -> FormId {
        let hash = hash_form(form);
        let Self {
            map,
            slab,
            spans,
            max_len,
        } = self;
        match map
            .raw_entry_mut()
            .from_hash(hash, |id| span_str(slab, spans, *id) == form)
        {
            RawEntryMut::Occupied(o) => *o.key(),
            RawEntryMut::Vacant(v) => {
                let id = FormId(
                    NonZeroU32::new(spans.len() as u32 + 1).unwrap_or(NonZeroU32::MIN),
                );
                spans.push((slab.len() as u32, form.len() as u32));
                slab.push_str(form);
                *max_len = (*max_len).max(form.chars().count());
                // ids hash as their text
                let (slab, spans) = (&*slab, &*spans);
                v.insert_with_hasher(hash, id, (), |id| {
                    hash_form(span_str(slab, spans, *id))
                });
                id
            }
        }
    }

    /// Id of `form` if already interned
    pub fn find(&self, form: &str) -> Option<FormId> {
        let hash = hash_form(form);
        self.map
            .raw_entry()
            .from_hash(hash, |id| span_str(&self.slab, &self.spans, *id) == form)
            .map(|(id, _)| *id)
    }

    /// Text of an id, `None` for an id from another table
    #[inline]
    pub fn resolve(&self, id: FormId) -> Option<&str> {
        if id.index() < self.spans.len() {
            Some(span_str(&self.slab, &self.spans, id))
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn compare(&self, id: FormId, form: &str) -> bool {
        self.resolve(id) == Some(form)
    }
}
