//! Kernel heap: a first-fit free-list allocator with block splitting and
//! incremental coalescing.
//!
//! Every region of the heap, allocated or free, is prefixed by a
//! `BlockHeader`; the headers form a singly linked list sorted by address
//! that covers the whole window. All raw-pointer manipulation of the heap
//! lives in this module; the rest of the kernel sees `NonNull<u8>` payloads
//! and the `GlobalAlloc` hook.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};
use spin::{Mutex, MutexGuard};

use crate::println;


/// Payload alignment. Sizes are rounded up to a multiple of this.
pub const ALIGN: usize = 8;

/// Residue below which a block is handed out whole instead of split,
/// so the tail is not fragmented into useless slivers.
const SPLIT_SLACK: usize = 64;

/// Per-block metadata prefix.
#[repr(C)]
struct BlockHeader {
    free: bool,
    /// Payload size in bytes, excluding this header.
    size: usize,
    /// Next block in address order.
    next: *mut BlockHeader,
}

/// Size of the metadata prefix in front of every payload.
pub const HEADER_SIZE: usize = core::mem::size_of::<BlockHeader>();

// Headers must not disturb payload alignment.
const _: () = assert!(HEADER_SIZE % ALIGN == 0);

const fn align_up(value: usize) -> usize {
    (value + ALIGN - 1) & !(ALIGN - 1)
}

/// Snapshot of the allocator accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    /// Size of the managed window (from the aligned start to the end).
    pub total: usize,
    /// Bytes currently handed out (payloads only).
    pub allocated: usize,
    /// Bytes currently free (payloads only).
    pub free: usize,
}

/// The free-list allocator over one contiguous heap window.
pub struct HeapAllocator {
    head: *mut BlockHeader,
    total: usize,
    allocated: usize,
    free: usize,
}

// The raw block pointers stay inside the heap window; access is serialized
// by the mutex around the global instance.
unsafe impl Send for HeapAllocator {}

impl HeapAllocator {
    /// An allocator with no memory. Every `alloc` fails until `init`.
    pub const fn empty() -> Self {
        HeapAllocator {
            head: ptr::null_mut(),
            total: 0,
            allocated: 0,
            free: 0,
        }
    }

    /// Take over the window `[start, end)`.
    ///
    /// # Safety
    ///
    /// The caller must guarantee the range is valid, writable memory that
    /// nothing else uses, and large enough for at least one block header.
    pub unsafe fn init(&mut self, start: usize, end: usize) {
        let start = align_up(start);
        let head = start as *mut BlockHeader;
        unsafe {
            (*head) = BlockHeader {
                free: true,
                size: end - start - HEADER_SIZE,
                next: ptr::null_mut(),
            };
        }
        self.head = head;
        self.total = end - start;
        self.allocated = 0;
        self.free = end - start - HEADER_SIZE;
    }

    /// Allocate `size` bytes, 8-aligned. Returns `None` when the request is
    /// zero or no free block is large enough; running out of memory is a
    /// recoverable condition for the caller.
    pub fn alloc(&mut self, size: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            return None;
        }
        let size = align_up(size);

        let mut current = self.head;
        while !current.is_null() {
            let block = unsafe { &mut *current };
            if block.free && block.size >= size {
                block.free = false;

                // Split when enough remains for a header plus a usable tail.
                if block.size > size + HEADER_SIZE + SPLIT_SLACK {
                    let tail = (current as usize + HEADER_SIZE + size) as *mut BlockHeader;
                    unsafe {
                        (*tail) = BlockHeader {
                            free: true,
                            size: block.size - size - HEADER_SIZE,
                            next: block.next,
                        };
                    }
                    block.next = tail;
                    block.size = size;
                    // The carved header comes out of free space.
                    self.free -= HEADER_SIZE;
                }

                self.allocated += block.size;
                self.free -= block.size;
                return NonNull::new((current as usize + HEADER_SIZE) as *mut u8);
            }
            current = block.next;
        }
        None
    }

    /// Return a payload to the free list, coalescing with the neighbors.
    ///
    /// Freeing a pointer that did not come from this allocator, or freeing
    /// the same pointer twice, is a programming error with undefined
    /// behavior.
    pub fn free(&mut self, payload: NonNull<u8>) {
        let header = (payload.as_ptr() as usize - HEADER_SIZE) as *mut BlockHeader;
        let block = unsafe { &mut *header };
        block.free = true;
        self.allocated -= block.size;
        self.free += block.size;

        // Absorb the following block if it is free.
        unsafe {
            if !block.next.is_null() && (*block.next).free {
                block.size += HEADER_SIZE + (*block.next).size;
                block.next = (*block.next).next;
                self.free += HEADER_SIZE;
            }
        }

        // Absorb into the preceding block if it is free. The list has no
        // back links, so walk from the head to find it.
        let mut current = self.head;
        while !current.is_null() && unsafe { (*current).next } != header {
            current = unsafe { (*current).next };
        }
        if !current.is_null() {
            let prev = unsafe { &mut *current };
            if prev.free {
                prev.size += HEADER_SIZE + block.size;
                prev.next = block.next;
                self.free += HEADER_SIZE;
            }
        }
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            total: self.total,
            allocated: self.allocated,
            free: self.free,
        }
    }

    /// Block list snapshot as (free, payload size) pairs, for tests.
    #[cfg(test)]
    pub(crate) fn blocks(&self) -> alloc::vec::Vec<(bool, usize)> {
        let mut out = alloc::vec::Vec::new();
        let mut current = self.head;
        while !current.is_null() {
            let block = unsafe { &*current };
            out.push((block.free, block.size));
            current = block.next;
        }
        out
    }
}

/// Mutex-guarded heap that doubles as the kernel's `GlobalAlloc`, so
/// `String`/`Vec`/`BTreeMap` draw from the same window on target.
pub struct LockedHeap(Mutex<HeapAllocator>);

impl LockedHeap {
    pub const fn empty() -> Self {
        LockedHeap(Mutex::new(HeapAllocator::empty()))
    }

    pub fn lock(&self) -> MutexGuard<'_, HeapAllocator> {
        self.0.lock()
    }
}

unsafe impl GlobalAlloc for LockedHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // Block payloads are 8-aligned; stricter layouts are not served.
        if layout.align() > ALIGN {
            return ptr::null_mut();
        }
        self.0
            .lock()
            .alloc(layout.size())
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        if let Some(payload) = NonNull::new(ptr) {
            self.0.lock().free(payload);
        }
    }
}

/// The kernel heap.
pub static HEAP: LockedHeap = LockedHeap::empty();

/// Point the global heap at the window `[start, end)` and log the bounds.
///
/// # Safety
///
/// Same contract as [`HeapAllocator::init`].
pub unsafe fn init(start: usize, end: usize) {
    unsafe {
        HEAP.lock().init(start, end);
    }
    println!("  Heap start: {:#x}", align_up(start));
    println!("  Heap end: {:#x}", end);
    println!("  Heap size: {} bytes", end - align_up(start));
}

/// Print the accounting snapshot (the `mem` shell command).
pub fn print_stats() {
    let stats = HEAP.lock().stats();
    println!("Memory Statistics:");
    println!("  Total: {} bytes", stats.total);
    println!("  Allocated: {} bytes", stats.allocated);
    println!("  Free: {} bytes", stats.free);
}
