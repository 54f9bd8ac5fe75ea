//! # Scheduler 模块
//!
//! 虚拟时钟上的一次性定时器队列。
//!
//! Runtime 不知道真实时间：Host 调用 `advance(dt)` 推进时钟，
//! 到期的定时器按截止时间顺序触发，截止时间相同的按登记顺序触发。
//! 触发过程中登记的新定时器若也在本次推进范围内，同样会被触发。

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// 队列条目
#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // BinaryHeap 是大顶堆，这里反转使最早的截止时间在堆顶
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// 定时器调度器
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// 创建调度器，时钟从 0 开始
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// 当前虚拟时间
    pub fn now(&self) -> Duration {
        self.now
    }

    /// 登记定时器，`delay` 之后触发
    pub fn schedule(&mut self, delay: Duration, payload: T) {
        let entry = Entry {
            deadline: self.now + delay,
            seq: self.next_seq,
            payload,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// 最早的截止时间
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|e| e.deadline)
    }

    /// 弹出截止时间不晚于 `limit` 的下一个定时器，并把时钟推进到它的截止时间
    pub fn pop_due(&mut self, limit: Duration) -> Option<T> {
        if self.next_deadline()? > limit {
            return None;
        }
        self.pop_next()
    }

    /// 弹出下一个定时器（不论是否到期），并把时钟推进到它的截止时间
    pub fn pop_next(&mut self) -> Option<T> {
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.deadline);
        Some(entry.payload)
    }

    /// 推进时钟到指定时间（不会倒退）
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// 清空所有定时器（时钟不变）
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// 待触发定时器数量
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// 是否没有待触发定时器
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
