//! CWE-indexed dangerous call sets
//!
//! Method names are matched by case-insensitive substring against each set,
//! so `__kfree_skb` counts as a use-after-free call. Sets overlap: one name
//! can increment several counters.

use serde::{Deserialize, Serialize};

const BUFFER_OVERFLOW: &[&str] = &[
    "strcpy", "strncpy", "strcat", "strncat", "sprintf", "vsprintf", "snprintf", "vsnprintf",
    "swprintf", "vswprintf", "memcpy", "memmove", "memset", "wmemcpy", "wmemmove", "wmemset",
    "bcopy", "bzero", "gets", "scanf", "sscanf", "fscanf", "vscanf", "vsscanf", "vfscanf",
    "getwd", "realpath", "copy_from_user", "copy_to_user", "__copy_from_user", "__copy_to_user",
    "strncpy_from_user", "strnlen_user", "get_user", "put_user", "probe_kernel_read",
    "probe_kernel_write",
];

const USE_AFTER_FREE: &[&str] = &[
    "free", "kfree", "vfree", "kvfree", "kzfree", "free_page", "__free_page", "__free_pages",
    "free_pages", "kmem_cache_free", "mempool_free", "put_device", "kobject_put", "kref_put",
    "refcount_dec", "module_put", "fput", "dput", "iput", "mntput", "sock_put", "sk_free",
    "dev_put", "in_dev_put", "file_free", "path_put", "dentry_free", "mutex_destroy",
    "spin_lock_destroy", "rwlock_destroy",
];

const BUFFER_UNDERREAD: &[&str] = &[
    "memchr", "strchr", "strrchr", "strstr", "strpbrk", "strlen", "strnlen", "wcslen", "wcsnlen",
    "array_index_nospec", "get_user", "__get_user", "probe_kernel_read", "copy_from_user",
    "readb", "readw", "readl", "readq", "ioread8", "ioread16", "ioread32",
];

const RACE_CONDITION: &[&str] = &[
    "mutex_lock", "mutex_unlock", "mutex_trylock", "spin_lock", "spin_unlock", "spin_lock_irq",
    "spin_unlock_irq", "spin_lock_irqsave", "spin_unlock_irqrestore", "raw_spin_lock",
    "raw_spin_unlock", "read_lock", "read_unlock", "write_lock", "write_unlock", "rw_lock",
    "rw_unlock", "atomic_read", "atomic_set", "atomic_inc", "atomic_dec", "atomic_add",
    "atomic_sub", "atomic_cmpxchg", "test_and_set_bit", "test_and_clear_bit", "rcu_read_lock",
    "rcu_read_unlock", "rcu_dereference", "synchronize_rcu", "call_rcu", "schedule", "yield",
    "msleep", "usleep_range",
];

const INFO_DISCLOSURE: &[&str] = &[
    "kmalloc", "vmalloc", "alloc_pages", "get_free_page", "kmem_cache_alloc", "mempool_alloc",
    "copy_to_user", "__copy_to_user", "put_user", "__put_user", "printk", "pr_debug", "pr_info",
    "dev_dbg", "dev_info", "seq_printf", "seq_write", "kallsyms_lookup", "sprint_symbol",
    "print_symbol",
];

const INPUT_VALIDATION: &[&str] = &[
    "sscanf", "scanf", "fscanf", "simple_strtoul", "simple_strtol", "kstrtoul", "kstrtol",
    "kstrtoull", "kstrtoll", "atoi", "atol", "atoll", "strtol", "strtoul", "strtoull", "recvfrom",
    "recv", "recvmsg", "read", "pread", "write", "pwrite", "readv", "writev",
];

const PRIVILEGE: &[&str] = &[
    "capable", "capable_wrt_inode_uidgid", "ns_capable", "has_capability", "security_capable",
    "setuid", "setgid", "seteuid", "setegid", "current_uid", "current_gid", "current_euid",
    "current_egid", "inode_permission", "may_open", "security_inode_permission",
];

const RESOURCE_LEAK: &[&str] = &[
    "kmalloc", "kzalloc", "vmalloc", "vzalloc", "kcalloc", "kmem_cache_alloc", "alloc_pages",
    "get_free_page", "open", "fopen", "filp_open", "dentry_open", "socket", "accept", "connect",
    "sock_create", "init_timer", "add_timer", "schedule_work", "queue_work",
];

const NULL_DEREF: &[&str] = &[
    "kmalloc", "kzalloc", "vmalloc", "kcalloc", "find_get_page", "page_address", "kmap",
    "ioremap", "dev_get_by_name", "dev_get_by_index", "alloc_netdev", "alloc_skb",
    "dev_alloc_skb",
];

/// Allocation primitives (memory_ops / malloc_calls)
pub const ALLOC_CALLS: &[&str] = &[
    "kmalloc", "kzalloc", "vmalloc", "vzalloc", "kcalloc", "malloc", "calloc", "realloc",
];

/// Deallocation primitives (memory_ops / free_calls)
pub const FREE_CALLS: &[&str] = &["kfree", "vfree", "kvfree", "kzfree", "free"];

/// Dangerous-call category, one per signature counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CweCategory {
    BufferOverflow,
    UseAfterFree,
    BufferUnderread,
    RaceCondition,
    InfoDisclosure,
    InputValidation,
    Privilege,
    ResourceLeak,
    NullDeref,
}

impl CweCategory {
    pub const ALL: [CweCategory; 9] = [
        CweCategory::BufferOverflow,
        CweCategory::UseAfterFree,
        CweCategory::BufferUnderread,
        CweCategory::RaceCondition,
        CweCategory::InfoDisclosure,
        CweCategory::InputValidation,
        CweCategory::Privilege,
        CweCategory::ResourceLeak,
        CweCategory::NullDeref,
    ];

    /// Call names of this category
    pub fn calls(&self) -> &'static [&'static str] {
        match self {
            CweCategory::BufferOverflow => BUFFER_OVERFLOW,
            CweCategory::UseAfterFree => USE_AFTER_FREE,
            CweCategory::BufferUnderread => BUFFER_UNDERREAD,
            CweCategory::RaceCondition => RACE_CONDITION,
            CweCategory::InfoDisclosure => INFO_DISCLOSURE,
            CweCategory::InputValidation => INPUT_VALIDATION,
            CweCategory::Privilege => PRIVILEGE,
            CweCategory::ResourceLeak => RESOURCE_LEAK,
            CweCategory::NullDeref => NULL_DEREF,
        }
    }

    /// CWE identifiers this category covers
    pub fn cwe_ids(&self) -> &'static [&'static str] {
        match self {
            CweCategory::BufferOverflow => &["CWE-119", "CWE-787"],
            CweCategory::UseAfterFree => &["CWE-416"],
            CweCategory::BufferUnderread => &["CWE-125"],
            CweCategory::RaceCondition => &["CWE-362"],
            CweCategory::InfoDisclosure => &["CWE-200"],
            CweCategory::InputValidation => &["CWE-20"],
            CweCategory::Privilege => &["CWE-264"],
            CweCategory::ResourceLeak => &["CWE-401"],
            CweCategory::NullDeref => &["CWE-476"],
        }
    }

    /// Category for a CWE identifier (`CWE-416`, case-insensitive)
    pub fn from_cwe(cwe_id: &str) -> Option<Self> {
        let cwe_id = cwe_id.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.cwe_ids().iter().any(|id| id.eq_ignore_ascii_case(cwe_id)))
    }

    /// Signature column counting this category
    pub fn column(&self) -> &'static str {
        match self {
            CweCategory::BufferOverflow => "buffer_overflow_calls",
            CweCategory::UseAfterFree => "use_after_free_calls",
            CweCategory::BufferUnderread => "buffer_underread_calls",
            CweCategory::RaceCondition => "race_condition_calls",
            CweCategory::InfoDisclosure => "info_disclosure_calls",
            CweCategory::InputValidation => "input_validation_calls",
            CweCategory::Privilege => "privilege_calls",
            CweCategory::ResourceLeak => "resource_leak_calls",
            CweCategory::NullDeref => "null_deref_calls",
        }
    }

    /// Whether a lowercase name contains any call of this category
    pub fn matches(&self, lowercase_name: &str) -> bool {
        contains_any(lowercase_name, self.calls())
    }
}

/// Substring match of a lowercase name against a call set
pub fn contains_any(lowercase_name: &str, calls: &[&str]) -> bool {
    !lowercase_name.is_empty() && calls.iter().any(|call| lowercase_name.contains(call))
}

/// Whether a lowercase name matches any category
pub fn is_dangerous(lowercase_name: &str) -> bool {
    CweCategory::ALL.iter().any(|c| c.matches(lowercase_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_matching() {
        assert!(CweCategory::UseAfterFree.matches("__kfree_skb"));
        assert!(CweCategory::BufferOverflow.matches("strcpy"));
        assert!(!CweCategory::Privilege.matches("strcpy"));
        assert!(!contains_any("", ALLOC_CALLS));
    }

    #[test]
    fn test_overlapping_sets() {
        // kmalloc is an info-disclosure, resource-leak and null-deref call
        let hits: Vec<_> = CweCategory::ALL
            .into_iter()
            .filter(|c| c.matches("kmalloc"))
            .collect();
        assert_eq!(
            hits,
            vec![
                CweCategory::InfoDisclosure,
                CweCategory::ResourceLeak,
                CweCategory::NullDeref
            ]
        );
    }

    #[test]
    fn test_from_cwe() {
        assert_eq!(CweCategory::from_cwe("CWE-787"), Some(CweCategory::BufferOverflow));
        assert_eq!(CweCategory::from_cwe("cwe-416"), Some(CweCategory::UseAfterFree));
        assert_eq!(CweCategory::from_cwe("CWE-999"), None);
    }

    #[test]
    fn test_is_dangerous() {
        assert!(is_dangerous("mutex_lock"));
        assert!(!is_dangerous("main"));
    }
}
